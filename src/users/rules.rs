use crate::filtering::{list_rules, ListFilter};
use crate::users::filtering::UsersFilter;
use crate::users::requests::{AuthenticateUser, ChangePassword, CreateUser, GetUsers, UpdateUser};
use crate::validation::{NumberRules, RuleSet, TextRules};

pub const MIN_PASSWORD_LENGTH: usize = 8;

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn password_rules() -> TextRules {
    TextRules::new()
        .required()
        .min_length(MIN_PASSWORD_LENGTH)
        .max_length(128)
}

pub fn create_user() -> RuleSet<CreateUser> {
    RuleSet::new()
        .text(
            "username",
            |u: &CreateUser| Some(u.username.as_str()),
            TextRules::new()
                .required()
                .min_length(3)
                .max_length(50)
                .chars(is_username_char),
        )
        .text(
            "email",
            |u: &CreateUser| Some(u.email.as_str()),
            TextRules::new().required().max_length(255).email(),
        )
        .text("password", |u: &CreateUser| Some(u.password.as_str()), password_rules())
        .text(
            "first_name",
            |u: &CreateUser| u.first_name.as_deref(),
            TextRules::new().max_length(100),
        )
        .text(
            "last_name",
            |u: &CreateUser| u.last_name.as_deref(),
            TextRules::new().max_length(100),
        )
}

pub fn update_user() -> RuleSet<UpdateUser> {
    RuleSet::new()
        .number("id", |u: &UpdateUser| Some(u.id), NumberRules::new().greater_than(0))
        .text(
            "email",
            |u: &UpdateUser| Some(u.email.as_str()),
            TextRules::new().required().max_length(255).email(),
        )
        .text(
            "first_name",
            |u: &UpdateUser| u.first_name.as_deref(),
            TextRules::new().max_length(100),
        )
        .text(
            "last_name",
            |u: &UpdateUser| u.last_name.as_deref(),
            TextRules::new().max_length(100),
        )
}

pub fn change_password() -> RuleSet<ChangePassword> {
    RuleSet::new()
        .text(
            "current_password",
            |c: &ChangePassword| Some(c.current_password.as_str()),
            TextRules::new().required(),
        )
        .text(
            "new_password",
            |c: &ChangePassword| Some(c.new_password.as_str()),
            password_rules(),
        )
        .must(
            "new_password",
            "must differ from the current password",
            |c: &ChangePassword| c.new_password != c.current_password,
        )
}

pub fn authenticate_user() -> RuleSet<AuthenticateUser> {
    RuleSet::new()
        .text(
            "username",
            |a: &AuthenticateUser| Some(a.username.as_str()),
            TextRules::new().required(),
        )
        .text(
            "password",
            |a: &AuthenticateUser| Some(a.password.as_str()),
            TextRules::new().required(),
        )
}

pub fn get_users() -> RuleSet<GetUsers> {
    list_rules(RuleSet::new(), |q| &q.list, UsersFilter::SORT_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validator;

    fn sign_up(username: &str, password: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: password.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_valid_sign_up_passes() {
        assert!(create_user().validate(&sign_up("brewer_1", "hunter22!")).is_empty());
    }

    #[test]
    fn test_short_password_and_bad_username_fail() {
        let failures = create_user().validate(&sign_up("a b", "short"));
        let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();

        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn test_password_must_change() {
        let request = ChangePassword {
            id: 1,
            current_password: "same-password".to_string(),
            new_password: "same-password".to_string(),
        };

        let failures = change_password().validate(&request);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "new_password");
    }
}

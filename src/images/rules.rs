use crate::images::models::{ImageOwner, ALLOWED_CONTENT_TYPES};
use crate::images::requests::{DeleteImage, GetImage, UploadImage};
use crate::validation::{NumberRules, RuleSet, TextRules};

fn owner_rules<T: 'static>(rules: RuleSet<T>, owner: fn(&T) -> &ImageOwner) -> RuleSet<T> {
    rules.number(
        "owner.id",
        move |t: &T| Some(owner(t).id()),
        NumberRules::new().greater_than(0),
    )
}

pub fn upload_image(max_bytes: usize) -> RuleSet<UploadImage> {
    owner_rules(RuleSet::new(), |u: &UploadImage| &u.owner)
        .text(
            "file_name",
            |u: &UploadImage| Some(u.file_name.as_str()),
            TextRules::new().required().max_length(255),
        )
        .text(
            "content_type",
            |u: &UploadImage| Some(u.content_type.as_str()),
            TextRules::new().required().one_of_ignore_case(ALLOWED_CONTENT_TYPES),
        )
        .number(
            "content",
            |u: &UploadImage| Some(u.content.len()),
            NumberRules::new().between(1, max_bytes),
        )
}

pub fn delete_image() -> RuleSet<DeleteImage> {
    owner_rules(RuleSet::new(), |d: &DeleteImage| &d.owner)
}

pub fn get_image() -> RuleSet<GetImage> {
    owner_rules(RuleSet::new(), |g: &GetImage| &g.owner)
}

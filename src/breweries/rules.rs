use crate::breweries::filtering::BreweriesFilter;
use crate::breweries::models::BreweryInput;
use crate::breweries::requests::{CreateBrewery, GetBreweries, UpdateBrewery};
use crate::filtering::{list_rules, ListFilter};
use crate::validation::{NumberRules, RuleSet, TextRules};

fn is_post_code_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')')
}

fn input_rules<T: 'static>(rules: RuleSet<T>, input: fn(&T) -> &BreweryInput) -> RuleSet<T> {
    rules
        .text(
            "name",
            move |t: &T| Some(input(t).name.as_str()),
            TextRules::new().required().max_length(200),
        )
        .text(
            "address.street",
            move |t: &T| Some(input(t).address.street.as_str()),
            TextRules::new().required().max_length(200),
        )
        .text(
            "address.number",
            move |t: &T| Some(input(t).address.number.as_str()),
            TextRules::new().required().max_length(10),
        )
        .text(
            "address.flat_number",
            move |t: &T| input(t).address.flat_number.as_deref(),
            TextRules::new().max_length(10),
        )
        .text(
            "address.post_code",
            move |t: &T| Some(input(t).address.post_code.as_str()),
            TextRules::new().required().max_length(10).chars(is_post_code_char),
        )
        .text(
            "address.city",
            move |t: &T| Some(input(t).address.city.as_str()),
            TextRules::new().required().max_length(100),
        )
        .text(
            "address.state",
            move |t: &T| input(t).address.state.as_deref(),
            TextRules::new().max_length(100),
        )
        .text(
            "address.country",
            move |t: &T| Some(input(t).address.country.as_str()),
            TextRules::new().required().max_length(100),
        )
        .text(
            "website",
            move |t: &T| input(t).website.as_deref(),
            TextRules::new().max_length(300).url(),
        )
        .text(
            "email",
            move |t: &T| input(t).email.as_deref(),
            TextRules::new().max_length(255).email(),
        )
        .text(
            "phone",
            move |t: &T| input(t).phone.as_deref(),
            TextRules::new().max_length(20).chars(is_phone_char),
        )
}

pub fn create_brewery() -> RuleSet<CreateBrewery> {
    input_rules(RuleSet::new(), |c| &c.input)
}

pub fn update_brewery() -> RuleSet<UpdateBrewery> {
    input_rules(
        RuleSet::<UpdateBrewery>::new().number("id", |u| Some(u.id), NumberRules::new().greater_than(0)),
        |u| &u.input,
    )
}

pub fn get_breweries() -> RuleSet<GetBreweries> {
    list_rules(RuleSet::new(), |q| &q.list, BreweriesFilter::SORT_COLUMNS)
}

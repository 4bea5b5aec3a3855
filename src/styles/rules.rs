use crate::filtering::{list_rules, ListFilter};
use crate::styles::filtering::BeerStylesFilter;
use crate::styles::models::BeerStyleInput;
use crate::styles::requests::{CreateBeerStyle, GetBeerStyles, UpdateBeerStyle};
use crate::validation::{NumberRules, RuleSet, TextRules};

fn input_rules<T: 'static>(rules: RuleSet<T>, input: fn(&T) -> &BeerStyleInput) -> RuleSet<T> {
    rules
        .text(
            "name",
            move |t: &T| Some(input(t).name.as_str()),
            TextRules::new().required().max_length(100),
        )
        .text(
            "description",
            move |t: &T| input(t).description.as_deref(),
            TextRules::new().max_length(1000),
        )
        .text(
            "country_of_origin",
            move |t: &T| input(t).country_of_origin.as_deref(),
            TextRules::new().max_length(100),
        )
}

pub fn create_beer_style() -> RuleSet<CreateBeerStyle> {
    input_rules(RuleSet::new(), |c| &c.input)
}

pub fn update_beer_style() -> RuleSet<UpdateBeerStyle> {
    input_rules(
        RuleSet::<UpdateBeerStyle>::new().number("id", |u| Some(u.id), NumberRules::new().greater_than(0)),
        |u| &u.input,
    )
}

pub fn get_beer_styles() -> RuleSet<GetBeerStyles> {
    list_rules(RuleSet::new(), |q| &q.list, BeerStylesFilter::SORT_COLUMNS)
}

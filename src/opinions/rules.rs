use crate::filtering::{list_rules, range_is_ordered, ListFilter};
use crate::opinions::filtering::OpinionsFilter;
use crate::opinions::models::{OpinionInput, MAX_RATING, MIN_RATING};
use crate::opinions::requests::{CreateOpinion, GetOpinions, UpdateOpinion};
use crate::validation::{NumberRules, RuleSet, TextRules};

fn input_rules<T: 'static>(rules: RuleSet<T>, input: fn(&T) -> &OpinionInput) -> RuleSet<T> {
    rules
        .number(
            "rating",
            move |t: &T| Some(input(t).rating),
            NumberRules::new().between(MIN_RATING, MAX_RATING),
        )
        .text(
            "comment",
            move |t: &T| input(t).comment.as_deref(),
            TextRules::new().max_length(1000),
        )
}

pub fn create_opinion() -> RuleSet<CreateOpinion> {
    input_rules(
        RuleSet::<CreateOpinion>::new().number(
            "beer_id",
            |c| Some(c.beer_id),
            NumberRules::new().greater_than(0),
        ),
        |c| &c.input,
    )
}

pub fn update_opinion() -> RuleSet<UpdateOpinion> {
    input_rules(
        RuleSet::<UpdateOpinion>::new().number("id", |u| Some(u.id), NumberRules::new().greater_than(0)),
        |u| &u.input,
    )
}

pub fn get_opinions() -> RuleSet<GetOpinions> {
    list_rules(RuleSet::<GetOpinions>::new(), |q| &q.list, OpinionsFilter::SORT_COLUMNS)
        .must("max_rating", "must not be less than the minimum", |q| {
            range_is_ordered(q.filter.min_rating, q.filter.max_rating)
        })
        .must("to", "must not be before the start of the range", |q| {
            range_is_ordered(q.filter.from, q.filter.to)
        })
}

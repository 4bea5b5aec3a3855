use crate::beers::filtering::BeersFilter;
use crate::beers::models::BeerInput;
use crate::beers::requests::{CreateBeer, GetBeers, UpdateBeer};
use crate::filtering::{list_rules, range_is_ordered, ListFilter};
use crate::validation::{NumberRules, RuleSet, TextRules};

pub const MAX_ALCOHOL_BY_VOLUME: f64 = 67.5;
pub const MAX_EXTRACT: f64 = 100.0;
pub const MAX_IBU: i32 = 200;

fn input_rules<T: 'static>(rules: RuleSet<T>, input: fn(&T) -> &BeerInput) -> RuleSet<T> {
    rules
        .text(
            "name",
            move |t: &T| Some(input(t).name.as_str()),
            TextRules::new().required().max_length(200),
        )
        .number(
            "brewery_id",
            move |t: &T| Some(input(t).brewery_id),
            NumberRules::new().greater_than(0),
        )
        .number(
            "beer_style_id",
            move |t: &T| input(t).beer_style_id,
            NumberRules::new().greater_than(0),
        )
        .number(
            "alcohol_by_volume",
            move |t: &T| Some(input(t).alcohol_by_volume),
            NumberRules::new().between(0.0, MAX_ALCOHOL_BY_VOLUME),
        )
        .number(
            "extract",
            move |t: &T| input(t).extract,
            NumberRules::new().between(0.0, MAX_EXTRACT),
        )
        .number(
            "ibu",
            move |t: &T| input(t).ibu,
            NumberRules::new().between(0, MAX_IBU),
        )
        .text(
            "description",
            move |t: &T| input(t).description.as_deref(),
            TextRules::new().max_length(1000),
        )
}

pub fn create_beer() -> RuleSet<CreateBeer> {
    input_rules(RuleSet::new(), |c| &c.input)
}

pub fn update_beer() -> RuleSet<UpdateBeer> {
    input_rules(
        RuleSet::<UpdateBeer>::new().number("id", |u| Some(u.id), NumberRules::new().greater_than(0)),
        |u| &u.input,
    )
}

pub fn get_beers() -> RuleSet<GetBeers> {
    list_rules(RuleSet::<GetBeers>::new(), |q| &q.list, BeersFilter::SORT_COLUMNS)
        .must("max_alcohol_by_volume", "must not be less than the minimum", |q| {
            range_is_ordered(q.filter.min_alcohol_by_volume, q.filter.max_alcohol_by_volume)
        })
        .must("max_extract", "must not be less than the minimum", |q| {
            range_is_ordered(q.filter.min_extract, q.filter.max_extract)
        })
        .must("max_ibu", "must not be less than the minimum", |q| {
            range_is_ordered(q.filter.min_ibu, q.filter.max_ibu)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validator;

    fn lager() -> BeerInput {
        BeerInput {
            name: "Lager".to_string(),
            brewery_id: 1,
            beer_style_id: Some(2),
            alcohol_by_volume: 5.2,
            extract: Some(12.0),
            ibu: Some(25),
            description: None,
        }
    }

    fn failed_fields(input: BeerInput) -> Vec<String> {
        create_beer()
            .validate(&CreateBeer { input })
            .into_iter()
            .map(|f| f.field)
            .collect()
    }

    #[test]
    fn test_valid_beer_passes() {
        assert!(failed_fields(lager()).is_empty());
    }

    #[test]
    fn test_measurements_out_of_range_fail() {
        let mut input = lager();
        input.alcohol_by_volume = 67.6;
        input.extract = Some(-1.0);
        input.ibu = Some(201);

        assert_eq!(failed_fields(input), vec!["alcohol_by_volume", "extract", "ibu"]);
    }

    #[test]
    fn test_boundaries_are_accepted() {
        let mut input = lager();
        input.alcohol_by_volume = MAX_ALCOHOL_BY_VOLUME;
        input.extract = Some(0.0);
        input.ibu = Some(MAX_IBU);

        assert!(failed_fields(input).is_empty());
    }

    #[test]
    fn test_reversed_ranges_fail() {
        let query = GetBeers {
            filter: BeersFilter {
                min_ibu: Some(50),
                max_ibu: Some(10),
                ..Default::default()
            },
            ..Default::default()
        };

        let failures = get_beers().validate(&query);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "max_ibu");
    }
}

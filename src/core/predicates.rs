use crate::core::filters::Filter;

/// A value bound to a positional query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    TextList(Vec<String>),
    Float(f64),
    Bool(bool),
}

/// One independent condition over the program/university join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Full-text match against the program search vector
    TextMatch,
    CountryIn,
    LevelIn,
    FieldIn,
    CurrencyEq,
    TuitionAtLeast,
    TuitionAtMost,
    ScholarshipEq,
}

impl Predicate {
    /// SQL fragment for this predicate reading its value from `$slot`
    pub fn render(self, slot: usize) -> String {
        match self {
            Predicate::TextMatch => {
                format!("programs.search_vector @@ plainto_tsquery('simple', ${slot})")
            }
            Predicate::CountryIn => format!("universities.country_code = ANY(${slot})"),
            Predicate::LevelIn => format!("programs.degree_level = ANY(${slot})"),
            Predicate::FieldIn => format!("programs.field = ANY(${slot})"),
            Predicate::CurrencyEq => format!("programs.tuition_currency = ${slot}"),
            Predicate::TuitionAtLeast => format!("programs.tuition_amount >= ${slot}"),
            Predicate::TuitionAtMost => format!("programs.tuition_amount <= ${slot}"),
            Predicate::ScholarshipEq => format!("programs.has_scholarship = ${slot}"),
        }
    }
}

/// A predicate together with the 1-based parameter slot it reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub predicate: Predicate,
    pub slot: usize,
}

/// Conjunction of predicates plus their parameter list
///
/// Clauses and parameters only grow together through [`PredicateSet::push`],
/// so slot `n` always refers to `params()[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateSet {
    clauses: Vec<Clause>,
    params: Vec<BindValue>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a canonical filter into its predicate conjunction
    ///
    /// The text match, when present, is always the first clause.
    pub fn compile(filter: &Filter) -> Self {
        let mut set = Self::new();

        if let Some(phrase) = filter.search_phrase() {
            set.push(Predicate::TextMatch, BindValue::Text(phrase.to_string()));
        }

        let sets = [
            (Predicate::CountryIn, &filter.countries),
            (Predicate::LevelIn, &filter.levels),
            (Predicate::FieldIn, &filter.fields),
        ];
        for (predicate, values) in sets {
            if !values.is_empty() {
                set.push(predicate, BindValue::TextList(values.iter().cloned().collect()));
            }
        }

        if let Some(currency) = &filter.currency {
            set.push(Predicate::CurrencyEq, BindValue::Text(currency.clone()));
        }
        if let Some(min) = filter.min_tuition {
            set.push(Predicate::TuitionAtLeast, BindValue::Float(min));
        }
        if let Some(max) = filter.max_tuition {
            set.push(Predicate::TuitionAtMost, BindValue::Float(max));
        }
        if let Some(flag) = filter.scholarship {
            set.push(Predicate::ScholarshipEq, BindValue::Bool(flag));
        }

        set
    }

    /// Append a predicate and its value, returning the slot it was bound to
    pub fn push(&mut self, predicate: Predicate, value: BindValue) -> usize {
        self.params.push(value);
        let slot = self.params.len();
        self.clauses.push(Clause { predicate, slot });
        slot
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Slot holding the search phrase, if a text match was compiled
    pub fn relevance_slot(&self) -> Option<usize> {
        self.clauses
            .iter()
            .find(|c| c.predicate == Predicate::TextMatch)
            .map(|c| c.slot)
    }

    /// WHERE body; `TRUE` when nothing constrains the listing
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            return "TRUE".to_string();
        }
        self.clauses
            .iter()
            .map(|c| c.predicate.render(c.slot))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::split_csv;

    #[test]
    fn test_empty_filter_compiles_to_true() {
        let set = PredicateSet::compile(&Filter::default());
        assert!(set.is_empty());
        assert!(set.params().is_empty());
        assert_eq!(set.where_sql(), "TRUE");
        assert_eq!(set.relevance_slot(), None);
    }

    #[test]
    fn test_search_phrase_takes_first_slot() {
        let filter = Filter {
            query: Some("physics".to_string()),
            countries: split_csv(Some("US")),
            ..Filter::default()
        };
        let set = PredicateSet::compile(&filter);

        assert_eq!(set.relevance_slot(), Some(1));
        assert_eq!(set.params()[0], BindValue::Text("physics".to_string()));
        assert_eq!(
            set.where_sql(),
            "programs.search_vector @@ plainto_tsquery('simple', $1) AND universities.country_code = ANY($2)"
        );
    }

    #[test]
    fn test_slots_stay_in_lock_step_with_params() {
        let filter = Filter {
            countries: split_csv(Some("US,GB")),
            levels: split_csv(Some("bachelor")),
            currency: Some("USD".to_string()),
            min_tuition: Some(1000.0),
            max_tuition: Some(5000.0),
            scholarship: Some(true),
            ..Filter::default()
        };
        let set = PredicateSet::compile(&filter);

        assert_eq!(set.len(), 6);
        assert_eq!(set.params().len(), 6);
        for (i, clause) in set.clauses().iter().enumerate() {
            assert_eq!(clause.slot, i + 1);
        }
        assert_eq!(
            set.params()[0],
            BindValue::TextList(vec!["GB".to_string(), "US".to_string()])
        );
        assert_eq!(set.params()[3], BindValue::Float(1000.0));
        assert_eq!(set.params()[5], BindValue::Bool(true));
    }

    #[test]
    fn test_tuition_bounds_are_independent() {
        let only_max = Filter {
            max_tuition: Some(5000.0),
            ..Filter::default()
        };
        let set = PredicateSet::compile(&only_max);
        assert_eq!(set.where_sql(), "programs.tuition_amount <= $1");
    }

    #[test]
    fn test_scholarship_false_still_constrains() {
        let filter = Filter {
            scholarship: Some(false),
            ..Filter::default()
        };
        let set = PredicateSet::compile(&filter);
        assert_eq!(set.where_sql(), "programs.has_scholarship = $1");
        assert_eq!(set.params(), &[BindValue::Bool(false)]);
    }

    #[test]
    fn test_values_never_inlined() {
        let filter = Filter {
            query: Some("'; DROP TABLE programs; --".to_string()),
            currency: Some("USD' OR '1'='1".to_string()),
            ..Filter::default()
        };
        let sql = PredicateSet::compile(&filter).where_sql();
        assert!(!sql.contains("DROP"));
        assert!(!sql.contains("OR"));
    }
}

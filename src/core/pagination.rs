use crate::core::filters::{clamp_limit, clamp_page, Filter};
use crate::core::predicates::{BindValue, PredicateSet};
use crate::core::sorting::OrderBy;

const FROM_JOIN: &str =
    "FROM programs JOIN universities ON universities.id = programs.university_id";

const CARD_COLUMNS: &str = "programs.id, programs.title, programs.degree_level, programs.field, \
     programs.language, programs.tuition_amount, programs.tuition_currency, \
     programs.has_scholarship, programs.scholarship_type, \
     programs.scholarship_percent_min, programs.scholarship_percent_max, \
     universities.id AS university_id, universities.name AS university_name, \
     universities.country_code, universities.city, universities.qs_rank, universities.the_rank";

/// Page number and size of one listing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl PageWindow {
    /// Build a window, applying the same clamps as the filter normalizer
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: clamp_page(Some(page)),
            limit: clamp_limit(Some(limit)),
        }
    }

    /// Rows skipped before this window
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// Number of pages needed to reach every one of `total` rows
    pub fn page_count(&self, total: i64) -> u32 {
        if total <= 0 {
            return 0;
        }
        let limit = i64::from(self.limit);
        u32::try_from((total + limit - 1) / limit).unwrap_or(u32::MAX)
    }
}

/// The count and window statements of one listing request
///
/// Both statements are rendered from the same [`PredicateSet`], so they bind
/// the same parameters in the same slots. The window statement only appends
/// LIMIT and OFFSET after them.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub predicates: PredicateSet,
    pub order: OrderBy,
    pub window: PageWindow,
}

impl CatalogQuery {
    pub fn build(filter: &Filter) -> Self {
        let predicates = PredicateSet::compile(filter);
        let order = OrderBy::resolve(filter.sort, predicates.relevance_slot());
        Self {
            predicates,
            order,
            window: PageWindow::new(i64::from(filter.page), i64::from(filter.limit)),
        }
    }

    /// Parameters shared by both statements
    pub fn params(&self) -> &[BindValue] {
        self.predicates.params()
    }

    pub fn limit_slot(&self) -> usize {
        self.params().len() + 1
    }

    pub fn offset_slot(&self) -> usize {
        self.params().len() + 2
    }

    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) AS total {FROM_JOIN} WHERE {}",
            self.predicates.where_sql()
        )
    }

    pub fn items_sql(&self) -> String {
        format!(
            "SELECT {CARD_COLUMNS} {FROM_JOIN} WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            self.predicates.where_sql(),
            self.order.to_sql(),
            self.limit_slot(),
            self.offset_slot()
        )
    }
}

use crate::domain::entities::query::Query;
use crate::domain::error::RejectionReason;
use crate::domain::values::lexicon::Lexicon;
use std::sync::Arc;

/// Turns away queries with no finance vocabulary before any network call.
pub struct Validator {
    lexicon: Arc<Lexicon>,
}

impl Validator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn validate(&self, query: &Query) -> Result<(), RejectionReason> {
        if query.is_empty() {
            return Err(RejectionReason::EmptyQuery);
        }
        let text = query.text();
        if self.lexicon.has_finance_keyword(text)
            || self.lexicon.mentions_company(text)
            || !self.lexicon.find_tickers(text).is_empty()
        {
            return Ok(());
        }
        Err(RejectionReason::NotFinanceRelated)
    }
}

use super::directory::UserDirectory;
use super::resource::Resource;
use crate::database::models::{Opportunity, OpportunityInput, OpportunityView};
use crate::database::{DocumentStore, Filter, ListQuery, Store};
use crate::error::ApiError;
use crate::types::RecordId;

impl Resource for Opportunity {
    type Input = OpportunityInput;
    type View = OpportunityView;

    fn collection(store: &Store) -> &dyn DocumentStore<Self> {
        &*store.opportunities
    }

    fn create(input: OpportunityInput, acting: RecordId) -> Result<Self, ApiError> {
        Opportunity::from_input(input, acting)
    }

    fn merge(&mut self, input: OpportunityInput) -> Result<(), ApiError> {
        self.apply(input)
    }

    fn user_refs(&self) -> Vec<RecordId> {
        vec![self.poster]
    }

    fn into_view(self, users: &UserDirectory) -> OpportunityView {
        OpportunityView {
            id: self.meta.id,
            poster: users.summary(self.poster),
            title: self.title,
            company: self.company,
            kind: self.kind,
            description: self.description,
            link: self.link,
            location: self.location,
            created_at: self.meta.created_at,
            updated_at: self.meta.updated_at,
        }
    }
}

/// `?type=` is an exact match; an unknown type simply matches nothing
pub fn list_query(kind: Option<String>) -> ListQuery {
    match kind.filter(|k| !k.trim().is_empty()) {
        Some(kind) => ListQuery::filtered(Filter::equals("type", kind)),
        None => ListQuery::all(),
    }
}

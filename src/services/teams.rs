use super::directory::UserDirectory;
use super::resource::Resource;
use crate::database::models::{Team, TeamInput, TeamView};
use crate::database::{DocumentStore, Filter, ListQuery, Store};
use crate::error::ApiError;
use crate::types::RecordId;

impl Resource for Team {
    type Input = TeamInput;
    type View = TeamView;

    fn collection(store: &Store) -> &dyn DocumentStore<Self> {
        &*store.teams
    }

    fn create(input: TeamInput, acting: RecordId) -> Result<Self, ApiError> {
        Team::from_input(input, acting)
    }

    fn merge(&mut self, input: TeamInput) -> Result<(), ApiError> {
        self.apply(input);
        Ok(())
    }

    fn user_refs(&self) -> Vec<RecordId> {
        std::iter::once(self.leader).chain(self.members.iter().copied()).collect()
    }

    fn into_view(self, users: &UserDirectory) -> TeamView {
        TeamView {
            id: self.meta.id,
            leader: users.summary(self.leader),
            members: users.summaries(&self.members),
            name: self.name,
            description: self.description,
            looking_for: self.looking_for,
            rank: self.rank,
            created_at: self.meta.created_at,
            updated_at: self.meta.updated_at,
        }
    }
}

pub fn list_query(search: Option<String>) -> ListQuery {
    match search.filter(|s| !s.trim().is_empty()) {
        Some(term) => ListQuery::filtered(Filter::search(Team::SEARCH_FIELDS, term.trim())),
        None => ListQuery::all(),
    }
}

use super::directory::UserDirectory;
use super::resource::Resource;
use crate::database::models::{Project, ProjectInput, ProjectView};
use crate::database::{DocumentStore, Filter, ListQuery, Store};
use crate::error::ApiError;
use crate::types::RecordId;

impl Resource for Project {
    type Input = ProjectInput;
    type View = ProjectView;

    fn collection(store: &Store) -> &dyn DocumentStore<Self> {
        &*store.projects
    }

    fn create(input: ProjectInput, acting: RecordId) -> Result<Self, ApiError> {
        Project::from_input(input, acting)
    }

    fn merge(&mut self, input: ProjectInput) -> Result<(), ApiError> {
        self.apply(input)
    }

    fn user_refs(&self) -> Vec<RecordId> {
        std::iter::once(self.owner).chain(self.members.iter().copied()).collect()
    }

    fn into_view(self, users: &UserDirectory) -> ProjectView {
        ProjectView {
            id: self.meta.id,
            owner: users.summary(self.owner),
            members: users.summaries(&self.members),
            title: self.title,
            description: self.description,
            tags: self.tags,
            link: self.link,
            image: self.image,
            status: self.status,
            created_at: self.meta.created_at,
            updated_at: self.meta.updated_at,
        }
    }
}

/// `?search=` matches title, description and tags
pub fn list_query(search: Option<String>) -> ListQuery {
    match search.filter(|s| !s.trim().is_empty()) {
        Some(term) => ListQuery::filtered(Filter::search(Project::SEARCH_FIELDS, term.trim())),
        None => ListQuery::all(),
    }
}

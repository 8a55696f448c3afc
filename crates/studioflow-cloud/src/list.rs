//! List scanner

use crate::error::Result;
use crate::event::{Action, ListPage};
use crate::handler::ResourceHandler;
use crate::request::ResourceHandlerRequest;
use crate::resource::ResourceKind;
use tracing::{Instrument, debug, info_span};

impl<K: ResourceKind> ResourceHandler<K> {
    /// One remote list call for the request's parent scope
    ///
    /// Resources in an absent state are dropped; everything else, in-progress
    /// ones included, is translated. The continuation token is passed through
    /// untouched in both directions.
    pub async fn list(
        &self,
        request: &ResourceHandlerRequest<K::Model>,
    ) -> Result<ListPage<K::Model>> {
        let span = info_span!("handler", type_name = self.type_name(), action = %Action::List);
        self.scan(request).instrument(span).await
    }

    async fn scan(&self, request: &ResourceHandlerRequest<K::Model>) -> Result<ListPage<K::Model>> {
        let scope = self.kind.handle(&request.desired_resource_state).scope();
        let page = self
            .kind
            .list(&scope, request.next_token.as_deref())
            .await
            .map_err(|err| self.remote_error("list", &scope, err))?;

        let table = self.kind.state_table();
        let total = page.items.len();
        let models: Vec<K::Model> = page
            .items
            .iter()
            .filter(|resource| !table.is_absent(self.kind.observe(resource).state))
            .map(|resource| self.kind.to_model(&scope, resource))
            .collect();

        debug!(
            "{} listed {} of {} resources (next token: {})",
            self.type_name(),
            models.len(),
            total,
            page.next_token.as_deref().unwrap_or("none")
        );

        Ok(ListPage {
            models,
            next_token: page.next_token,
        })
    }
}

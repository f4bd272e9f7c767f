use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use innube_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tracing::info;

mod errors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    config: RestServerConfig,
    contact: Contact,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    /// Origins echoed back in `Access-Control-Allow-Origin`. Matched exactly.
    pub allowed_origins: Arc<[String]>,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(config: RestServerConfig, contact: Contact) -> Self {
        Self { config, contact }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await.map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let router = Router::new().merge(routes::contact::router(self.contact.into()));

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::cors::add(router, self.config.allowed_origins);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

use draftgap::database::Repository;
use draftgap::knowledge::Knowledge;
use draftgap::server::Server;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    draftgap::init();
    let dir = std::env::var("KNOWLEDGE_DIR").unwrap_or_else(|_| "knowledge".to_string());
    let knowledge = Arc::new(Knowledge::load(Path::new(&dir)));
    let repository = Arc::new(Repository::from((draftgap::db().await, knowledge.clone())));
    Server::run(knowledge, repository).await
}

//! Slash commands for the interactive session.

pub mod builtins;
pub mod registry;

#[cfg(test)]
pub(crate) fn test_session() -> maeum_core::Session {
    use std::sync::Arc;

    use maeum_core::{Dispatcher, StaticTree};
    use maeum_llm::HttpBackend;
    use maeum_types::config::Config;

    let config = Config::default();
    let backend = HttpBackend::new(&config.backend).unwrap();
    let dispatcher = Dispatcher::new(&config, Arc::new(backend), Arc::new(StaticTree::default()));
    maeum_core::Session::new(Arc::new(dispatcher), config.session.note_limit)
}

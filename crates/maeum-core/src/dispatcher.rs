//! Action dispatch.
//!
//! The dispatcher is stateless apart from its configuration: session
//! state lives in the caller's [`ContextStore`] and is passed in per
//! call. ARCH_SNAPSHOT, PATH_JUDGE and CONTEXT_SET run locally; ERROR_CUT
//! and SILENT go to the [`Generator`] under a deadline and a
//! cancellation token. A forwarded turn never mutates the store, so a
//! failed or aborted call leaves the session exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use maeum_llm::{GenerationRequest, Generator};
use maeum_types::config::{BackendConfig, Config};
use maeum_types::{Action, ContextState, Decision, MaeumError, Result, Signal, SignalKind};

use crate::clarify::render_menu;
use crate::context_store::ContextStore;
use crate::detector::{SignalDetector, strip_tree_decoration};
use crate::error_cut::error_request;
use crate::graph::listing::parse_listing;
use crate::graph::{EdgeInference, FileEntry, SemanticGraphBuilder, normalize_path};
use crate::matcher::best_pattern;
use crate::path_judge::PathRoleJudge;
use crate::patterns::PatternVocabulary;
use crate::resolver::{Resolution, resolve};
use crate::snapshot::render_snapshot;
use crate::tree::TreeSource;

/// What a turn shows the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutput {
    /// Lines to print verbatim.
    Text(String),
    /// The clarify menu; the next turn is read as a selection.
    Menu(String),
    /// Nothing (CONTEXT_SET).
    Silent,
}

impl TurnOutput {
    /// The printable text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            TurnOutput::Text(s) | TurnOutput::Menu(s) => Some(s),
            TurnOutput::Silent => None,
        }
    }
}

/// A dispatched turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub action: Action,
    pub output: TurnOutput,
}

pub struct Dispatcher {
    detector: SignalDetector,
    judge: PathRoleJudge,
    builder: SemanticGraphBuilder,
    vocabulary: PatternVocabulary,
    min_satisfaction: f64,
    backend: BackendConfig,
    timeout: Duration,
    generator: Arc<dyn Generator>,
    tree: Arc<dyn TreeSource>,
}

impl Dispatcher {
    /// Build a dispatcher from configuration.
    ///
    /// Custom pattern entries that fail validation are logged and
    /// skipped; the rest of the vocabulary is kept.
    pub fn new(config: &Config, generator: Arc<dyn Generator>, tree: Arc<dyn TreeSource>) -> Self {
        let (vocabulary, rejected) = PatternVocabulary::with_custom(&config.patterns.custom);
        if !rejected.is_empty() {
            warn!(skipped = rejected.len(), "some pattern entries were skipped");
        }
        Self {
            detector: SignalDetector::new(),
            judge: PathRoleJudge::new(),
            builder: SemanticGraphBuilder::default(),
            vocabulary,
            min_satisfaction: config.patterns.min_satisfaction,
            backend: config.backend.clone(),
            timeout: Duration::from_secs(config.backend.timeout_secs),
            generator,
            tree,
        }
    }

    /// Override the forwarding deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Swap the edge inference rule used for snapshots.
    pub fn with_edge_inference(mut self, inference: Arc<dyn EdgeInference>) -> Self {
        self.builder = SemanticGraphBuilder::new(inference);
        self
    }

    pub fn vocabulary(&self) -> &PatternVocabulary {
        &self.vocabulary
    }

    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    /// Detect and resolve without executing anything.
    pub fn classify(&self, text: &str) -> (Vec<Signal>, Resolution) {
        let signals = self.detector.detect(text);
        let resolution = resolve(&signals);
        (signals, resolution)
    }

    /// Run `action` on a turn.
    ///
    /// `signals` are the turn's detected signals; they supply the path
    /// span and the declared phase.
    ///
    /// # Errors
    ///
    /// Forwarded actions fail with [`MaeumError::Timeout`],
    /// [`MaeumError::Cancelled`] or [`MaeumError::Backend`]. A snapshot
    /// fails only if the tree source does.
    pub async fn execute(
        &self,
        action: Action,
        text: &str,
        signals: &[Signal],
        store: &mut ContextStore,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome> {
        debug!(%action, "dispatching turn");
        let output = match action {
            Action::ArchSnapshot => TurnOutput::Text(self.snapshot(text).await?),
            Action::PathJudge => {
                let path = path_argument(text, signals);
                TurnOutput::Text(self.judge_path(&path, store.state()).render())
            }
            Action::ContextSet => {
                match signals.iter().find_map(|s| s.phase) {
                    Some(phase) => store.set_phase(phase, text),
                    None => debug!("no phase named; context unchanged"),
                }
                TurnOutput::Silent
            }
            Action::ErrorCut => {
                let request = error_request(text, store.state(), &self.backend);
                TurnOutput::Text(self.forward(&request, cancel).await?)
            }
            Action::Silent => {
                let request =
                    GenerationRequest::new(text, &self.backend.system_prompt, self.backend.max_tokens);
                TurnOutput::Text(self.forward(&request, cancel).await?)
            }
            Action::Clarify => TurnOutput::Menu(render_menu()),
        };
        Ok(TurnOutcome { action, output })
    }

    /// Render the four-line structural snapshot.
    ///
    /// A pasted listing is used when the turn parses as one; a bare `.`
    /// (or a listing with no source files) falls back to the tree source,
    /// which is scanned on the blocking pool.
    pub async fn snapshot(&self, text: &str) -> Result<String> {
        let pasted = if text.trim() == "." {
            Vec::new()
        } else {
            parse_listing(text)
        };
        let files = if pasted.is_empty() {
            self.scan_tree().await?
        } else {
            pasted
        };
        let graph = self.builder.build(&files);
        let best = best_pattern(&self.vocabulary, &graph, self.min_satisfaction);
        debug!(
            entities = graph.entity_order().len(),
            pattern = best.as_ref().map_or("none", |b| b.pattern.name.as_str()),
            "snapshot"
        );
        Ok(render_snapshot(&graph, best.as_ref()))
    }

    async fn scan_tree(&self) -> Result<Vec<FileEntry>> {
        let tree = Arc::clone(&self.tree);
        match tokio::task::spawn_blocking(move || tree.files()).await {
            Ok(files) => files,
            Err(e) => Err(MaeumError::Io(std::io::Error::other(e))),
        }
    }

    pub fn judge_path(&self, path: &str, state: ContextState) -> Decision {
        self.judge.judge(path, state)
    }

    async fn forward(&self, request: &GenerationRequest, cancel: &CancellationToken) -> Result<String> {
        let generator = self.generator.name().to_string();
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!(%generator, "forwarded turn cancelled");
                Err(MaeumError::Cancelled)
            }
            result = tokio::time::timeout(self.timeout, self.generator.generate(request)) => {
                match result {
                    Ok(Ok(answer)) => Ok(answer),
                    Ok(Err(e)) => {
                        warn!(%generator, error = %e, "backend call failed");
                        Err(e.into())
                    }
                    Err(_) => {
                        warn!(%generator, timeout_ms = self.timeout.as_millis() as u64, "backend call timed out");
                        Err(MaeumError::Timeout {
                            secs: self.timeout.as_secs(),
                        })
                    }
                }
            }
        }
    }
}

/// The path a PATH_JUDGE turn is about: the path signal's span, or the
/// undecorated turn text when the action was chosen from the menu.
fn path_argument(text: &str, signals: &[Signal]) -> String {
    let raw = signals
        .iter()
        .find(|s| s.kind == SignalKind::Path)
        .and_then(|s| text.get(s.span.clone()))
        .unwrap_or_else(|| strip_tree_decoration(text.trim()).1);
    normalize_path(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StaticTree;
    use async_trait::async_trait;
    use maeum_llm::BackendError;
    use maeum_types::{Phase, Role};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<GenerationRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl Generator for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn generate(&self, request: &GenerationRequest) -> maeum_llm::Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                Err(BackendError::RequestFailed("HTTP 500: boom".into()))
            } else {
                Ok(format!("echo: {}", request.message))
            }
        }
    }

    fn dispatcher(generator: Arc<Recorder>, tree: Vec<FileEntry>) -> Dispatcher {
        Dispatcher::new(
            &Config::default(),
            generator,
            Arc::new(StaticTree::new(tree)),
        )
    }

    async fn run(d: &Dispatcher, store: &mut ContextStore, text: &str) -> Result<TurnOutcome> {
        let (signals, resolution) = d.classify(text);
        d.execute(resolution.action(), text, &signals, store, &CancellationToken::new())
            .await
    }

    #[tokio::test]
    async fn path_from_decorated_menu_choice() {
        let d = dispatcher(Arc::default(), vec![]);
        let mut store = ContextStore::default();
        let text = "├── src/auth/auth.service.ts";
        let (signals, _) = d.classify(text);
        store.set_phase(Phase::Refactor, "refactor");
        let out = d
            .execute(Action::PathJudge, text, &signals, &mut store, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out.output, TurnOutput::Text("Role: core\nDecision: NO-GO".into()));
    }

    #[tokio::test]
    async fn context_set_without_phase_is_noop() {
        let d = dispatcher(Arc::default(), vec![]);
        let mut store = ContextStore::default();
        store.set_phase(Phase::Stabilize, "stabilize");
        let out = d
            .execute(Action::ContextSet, "src/a.ts", &[], &mut store, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out.output, TurnOutput::Silent);
        assert_eq!(store.phase(), Phase::Stabilize);
    }

    #[tokio::test]
    async fn silent_forwards_verbatim() {
        let gen_ = Arc::new(Recorder::default());
        let d = dispatcher(gen_.clone(), vec![]);
        let mut store = ContextStore::default();
        let out = run(&d, &mut store, "explain borrowing").await.unwrap();
        assert_eq!(out.action, Action::Silent);
        assert_eq!(out.output.text(), Some("echo: explain borrowing"));
        let sent = gen_.requests.lock().unwrap();
        assert_eq!(sent[0].message, "explain borrowing");
        assert!(sent[0].context.is_none());
        assert!(sent[0].coding_mode);
    }

    #[tokio::test]
    async fn backend_failure_is_turn_local() {
        let gen_ = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let d = dispatcher(gen_, vec![]);
        let mut store = ContextStore::default();
        store.set_phase(Phase::Refactor, "refactor");
        let err = run(&d, &mut store, "TypeError: boom").await.unwrap_err();
        assert!(matches!(err, MaeumError::Backend(_)), "{err}");
        assert!(err.is_turn_local());
        assert_eq!(store.phase(), Phase::Refactor);
    }

    #[tokio::test]
    async fn dot_uses_tree_source() {
        let tree = vec![
            FileEntry::new("src/user/user.controller.ts").with_references(["./user.service"]),
            FileEntry::new("src/user/user.service.ts"),
        ];
        let d = dispatcher(Arc::default(), tree);
        let mut store = ContextStore::default();
        let out = run(&d, &mut store, ".").await.unwrap();
        assert_eq!(
            out.output.text().unwrap(),
            "[ARCH_SNAPSHOT]\nCore: user\nFlow: entry -> core\nPattern: REST_RESOURCE"
        );
    }

    struct BrokenTree;

    impl TreeSource for BrokenTree {
        fn files(&self) -> Result<Vec<FileEntry>> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "walk denied").into())
        }
    }

    #[tokio::test]
    async fn tree_failure_fails_the_snapshot() {
        let d = Dispatcher::new(&Config::default(), Arc::new(Recorder::default()), Arc::new(BrokenTree));
        let err = d.snapshot(".").await.unwrap_err();
        assert!(matches!(err, MaeumError::Io(_)), "{err}");
    }

    #[tokio::test]
    async fn pasted_listing_wins_over_tree() {
        let d = dispatcher(Arc::default(), vec![FileEntry::new("src/x/x.service.ts")]);
        let out = d
            .snapshot("src/order/order.controller.ts\nsrc/order/order.repository.ts")
            .await
            .unwrap();
        assert!(out.contains("Core: order\n"), "{out}");
    }

    #[tokio::test]
    async fn pasted_listing_without_imports_claims_no_pattern() {
        let d = dispatcher(Arc::default(), vec![]);
        let out = d
            .snapshot("src/user/user.controller.ts\nsrc/user/user.service.ts\nsrc/user/user.repository.ts")
            .await
            .unwrap();
        assert_eq!(out, "[ARCH_SNAPSHOT]\nCore: user\nFlow: none\nPattern: none");
    }

    #[test]
    fn custom_patterns_extend_vocabulary() {
        let mut config = Config::default();
        config.patterns.custom = serde_json::from_str(
            r#"[{"name": "TESTED_ENTRY", "requiredRoles": ["entry", "test"], "flow": ["test -> entry"]},
                {"name": "BROKEN", "requiredRoles": ["gateway"]}]"#,
        )
        .unwrap();
        let d = Dispatcher::new(&config, Arc::new(Recorder::default()), Arc::new(StaticTree::default()));
        assert_eq!(d.vocabulary().len(), 6);
        assert!(d.vocabulary().get("TESTED_ENTRY").is_some());
        assert!(d.vocabulary().get("BROKEN").is_none());
    }

    struct EntryToCore;

    impl EdgeInference for EntryToCore {
        fn infer_edges(&self, _files: &[FileEntry], graph: &crate::graph::SemanticGraph) -> Vec<crate::graph::Edge> {
            let mut edges = Vec::new();
            for from in graph.nodes().filter(|n| n.role == Role::Entry) {
                for to in graph.nodes().filter(|n| n.role == Role::Core) {
                    edges.push(crate::graph::Edge::import(from, to));
                }
            }
            edges
        }
    }

    #[tokio::test]
    async fn edge_inference_is_swappable() {
        let mut config = Config::default();
        config.patterns.min_satisfaction = 1.0;
        let build = || {
            Dispatcher::new(&config, Arc::new(Recorder::default()), Arc::new(StaticTree::default()))
        };
        let listing = "src/user/user.controller.ts\nsrc/user/user.service.ts";

        let plain = build().snapshot(listing).await.unwrap();
        assert!(plain.ends_with("Pattern: none"), "{plain}");

        let wired = build()
            .with_edge_inference(Arc::new(EntryToCore))
            .snapshot(listing)
            .await
            .unwrap();
        assert!(wired.ends_with("Flow: entry -> core\nPattern: REST_RESOURCE"), "{wired}");
    }

    #[test]
    fn judge_reads_given_state() {
        let d = dispatcher(Arc::default(), vec![]);
        let decision = d.judge_path("src/pay/payment.repo.ts", ContextState::from_phase(Phase::Stabilize));
        assert_eq!(decision.role, Role::Infra);
        assert!(decision.rationale.contains("payment"));
    }
}

//! Source resolution strategies
//!
//! A registry owns an ordered list of strategies. Each strategy either
//! declines a source string (the chain continues), resolves it to content,
//! or fails (the chain stops; there is no silent fall-through past a
//! matching strategy). The built-in chain is file existence, then URL
//! grammar, then a literal fallback that always matches.

use std::fs;
use std::path::Path;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use avob_format::{AvobError, Result, SourceDescriptor};

/// Strict URL grammar; a source must match in full to be fetched.
const URL_PATTERN: &str = r"^https?://[-A-Za-z0-9$_@.&+!*(),/:%=?#~]+$";

/// Outcome of offering a source string to one strategy.
#[derive(Debug)]
pub enum Resolution {
    /// The strategy does not recognize this source; try the next one.
    NotApplicable,
    /// The strategy produced content.
    Resolved(String),
    /// The strategy matched but could not deliver; resolution stops here.
    Failed(AvobError),
}

/// A single resolver strategy.
///
/// The trait signature is the statically-checked form of the original
/// one-argument, two-element-result convention for pluggable resolvers.
pub trait ResolveStrategy: Send + Sync {
    /// Unique name; registration rejects duplicates.
    fn name(&self) -> &str;

    /// Descriptor recorded for content this strategy resolved.
    fn descriptor(&self, source: &str) -> SourceDescriptor;

    /// Offer a source string to this strategy.
    fn resolve(&self, source: &str) -> Resolution;

    /// Fallback strategies always match; caller registrations are inserted
    /// ahead of them so they stay reachable.
    fn is_fallback(&self) -> bool {
        false
    }
}

/// Successfully resolved content plus which pathway produced it.
#[derive(Debug)]
pub struct ResolvedSource {
    /// The JSON text.
    pub content: String,
    /// Which strategy produced it.
    pub descriptor: SourceDescriptor,
}

struct FileStrategy;

impl ResolveStrategy for FileStrategy {
    fn name(&self) -> &str {
        "file"
    }

    fn descriptor(&self, source: &str) -> SourceDescriptor {
        let path = Path::new(source);
        SourceDescriptor::FilePath(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
    }

    fn resolve(&self, source: &str) -> Resolution {
        let path = Path::new(source);
        if !path.is_file() {
            return Resolution::NotApplicable;
        }
        match fs::read_to_string(path) {
            Ok(content) => Resolution::Resolved(content),
            Err(e) => Resolution::Failed(AvobError::SourceFetch(format!(
                "cannot read {}: {}",
                source, e
            ))),
        }
    }
}

struct UrlStrategy {
    pattern: Regex,
    timeout: Duration,
}

impl UrlStrategy {
    fn new(timeout: Duration) -> Self {
        Self {
            pattern: Regex::new(URL_PATTERN).expect("URL pattern compiles"),
            timeout,
        }
    }

    fn fetch(&self, source: &str) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AvobError::SourceFetch(e.to_string()))?;
        let response = client
            .get(source)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AvobError::SourceFetch(format!("GET {}: {}", source, e)))?;
        response
            .text()
            .map_err(|e| AvobError::SourceFetch(format!("GET {}: {}", source, e)))
    }
}

impl ResolveStrategy for UrlStrategy {
    fn name(&self) -> &str {
        "url"
    }

    fn descriptor(&self, source: &str) -> SourceDescriptor {
        SourceDescriptor::Url(source.to_string())
    }

    fn resolve(&self, source: &str) -> Resolution {
        if !self.pattern.is_match(source) {
            return Resolution::NotApplicable;
        }
        match self.fetch(source) {
            Ok(content) => Resolution::Resolved(content),
            Err(e) => Resolution::Failed(e),
        }
    }
}

struct LiteralStrategy;

impl ResolveStrategy for LiteralStrategy {
    fn name(&self) -> &str {
        "literal"
    }

    fn descriptor(&self, _source: &str) -> SourceDescriptor {
        SourceDescriptor::LiteralText
    }

    fn resolve(&self, source: &str) -> Resolution {
        Resolution::Resolved(source.to_string())
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

/// Ordered strategy chain with explicit ownership; no process-wide state.
pub struct ResolverRegistry {
    strategies: Vec<Box<dyn ResolveStrategy>>,
    fetch_timeout: Duration,
}

impl ResolverRegistry {
    /// Registry with the built-in chain and the given URL fetch deadline.
    pub fn new(fetch_timeout: Duration) -> Self {
        let mut registry = Self {
            strategies: Vec::new(),
            fetch_timeout,
        };
        registry.reset();
        registry
    }

    /// Restore the built-in chain, dropping caller registrations.
    pub fn reset(&mut self) {
        self.strategies = vec![
            Box::new(FileStrategy),
            Box::new(UrlStrategy::new(self.fetch_timeout)),
            Box::new(LiteralStrategy),
        ];
    }

    /// Register a strategy ahead of the fallback.
    ///
    /// Returns `false` without touching the chain when a strategy with the
    /// same name is already present.
    pub fn register(&mut self, strategy: Box<dyn ResolveStrategy>) -> bool {
        if self.strategies.iter().any(|s| s.name() == strategy.name()) {
            return false;
        }
        let at = self
            .strategies
            .iter()
            .position(|s| s.is_fallback())
            .unwrap_or(self.strategies.len());
        self.strategies.insert(at, strategy);
        true
    }

    /// Names of the registered strategies, in resolution order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a source string to JSON text.
    ///
    /// The winning strategy's content must parse as JSON; content that does
    /// not is a [`AvobError::JsonParse`] no matter which strategy produced
    /// it.
    pub fn resolve(&self, source: &str) -> Result<ResolvedSource> {
        for strategy in &self.strategies {
            match strategy.resolve(source) {
                Resolution::NotApplicable => continue,
                Resolution::Failed(err) => {
                    debug!(strategy = strategy.name(), %err, "source resolution failed");
                    return Err(err);
                }
                Resolution::Resolved(content) => {
                    debug!(strategy = strategy.name(), "source resolved");
                    serde_json::from_str::<serde_json::Value>(&content).map_err(|e| {
                        AvobError::JsonParse(format!(
                            "content from {} strategy: {}",
                            strategy.name(),
                            e
                        ))
                    })?;
                    return Ok(ResolvedSource {
                        content,
                        descriptor: strategy.descriptor(source),
                    });
                }
            }
        }
        Err(AvobError::SourceFetch(format!(
            "no resolver strategy matched {:?}",
            source
        )))
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

//! ---
//! acts_section: "06-test-runner"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Suite declaration with lifecycle hooks and async cases."
//! acts_version: "v0.1.0"
//! acts_owner: "tbd"
//! ---
use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

/// Future produced by a case body or hook.
pub type CaseFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Factory invoked once per execution of a case or hook.
pub type CaseBody = Box<dyn Fn() -> CaseFuture + Send + Sync>;

fn boxed<F, Fut>(body: F) -> CaseBody
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(move || body().boxed())
}

/// A single `it` block.
pub struct Case {
    name: String,
    timeout: Option<Duration>,
    body: CaseBody,
}

impl Case {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-case deadline; `None` falls back to the runner default.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn start(&self) -> CaseFuture {
        (self.body)()
    }
}

impl std::fmt::Debug for Case {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Lifecycle points a hook can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    BeforeAll,
    AfterAll,
    BeforeEach,
    AfterEach,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::BeforeAll => "before_all",
            HookKind::AfterAll => "after_all",
            HookKind::BeforeEach => "before_each",
            HookKind::AfterEach => "after_each",
        }
    }
}

/// A `describe` block: named cases sharing lifecycle hooks.
///
/// Hooks run in registration order. `before_each`/`after_each` wrap every
/// case that is not filtered out; `after_each` runs even when the case
/// failed.
#[derive(Default)]
pub struct Suite {
    name: String,
    before_all: Vec<CaseBody>,
    after_all: Vec<CaseBody>,
    before_each: Vec<CaseBody>,
    after_each: Vec<CaseBody>,
    cases: Vec<Case>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn before_all<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.before_all.push(boxed(hook));
        self
    }

    pub fn after_all<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.after_all.push(boxed(hook));
        self
    }

    pub fn before_each<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.before_each.push(boxed(hook));
        self
    }

    pub fn after_each<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.after_each.push(boxed(hook));
        self
    }

    /// Add a case. `timeout` overrides the runner's default deadline.
    pub fn it<F, Fut>(mut self, name: impl Into<String>, timeout: Option<Duration>, body: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.cases.push(Case {
            name: name.into(),
            timeout,
            body: boxed(body),
        });
        self
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn case_names(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(Case::name)
    }

    pub(crate) fn hooks(&self, kind: HookKind) -> &[CaseBody] {
        match kind {
            HookKind::BeforeAll => &self.before_all,
            HookKind::AfterAll => &self.after_all,
            HookKind::BeforeEach => &self.before_each,
            HookKind::AfterEach => &self.after_each,
        }
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("cases", &self.cases)
            .field("before_all", &self.before_all.len())
            .field("after_all", &self.after_all.len())
            .field("before_each", &self.before_each.len())
            .field("after_each", &self.after_each.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_declaration_order() {
        let suite = Suite::new("WorkerTest")
            .before_each(|| async { Ok(()) })
            .it("first", None, || async { Ok(()) })
            .it("second", Some(Duration::from_secs(1)), || async { Ok(()) });
        assert_eq!(suite.case_names().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(suite.hooks(HookKind::BeforeEach).len(), 1);
        assert_eq!(suite.cases()[1].timeout(), Some(Duration::from_secs(1)));
    }
}

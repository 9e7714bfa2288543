use log::debug;
use std::fmt;

/// What a pre-break hook wants to happen to the pending break
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Let the break go ahead (and keep consulting later hooks)
    Continue,
    /// Cancel the break; no column or page advance happens this time
    Veto,
}

/// One step of the column cursor
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Index of the column that is now current
    pub column: usize,
    /// Whether a new page was started to get there
    pub new_page: bool,
}

/// Result of asking for a hook-checked break
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BreakOutcome {
    Advanced(Advance),
    Vetoed,
}

impl BreakOutcome {
    pub fn is_vetoed(&self) -> bool {
        matches!(self, BreakOutcome::Vetoed)
    }
}

type Hook<T> = Box<dyn FnMut(&mut T) -> HookOutcome>;

/// Named callbacks consulted, in registration order, before a break is carried out.
///
/// Registering a name that already exists replaces that hook in place, keeping its
/// position in the chain.
pub struct BreakHooks<T> {
    hooks: Vec<(String, Hook<T>)>,
}

impl<T> Default for BreakHooks<T> {
    fn default() -> Self {
        BreakHooks { hooks: Vec::new() }
    }
}

impl<T> fmt::Debug for BreakHooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<T> BreakHooks<T> {
    pub fn insert<S, F>(&mut self, name: S, hook: F)
    where
        S: Into<String>,
        F: FnMut(&mut T) -> HookOutcome + 'static,
    {
        self.insert_boxed(name.into(), Box::new(hook));
    }

    fn insert_boxed(&mut self, name: String, hook: Hook<T>) {
        match self.hooks.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = hook,
            None => self.hooks.push((name, hook)),
        }
    }

    /// Remove a hook by name, returning whether it was registered
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(n, _)| n != name);
        self.hooks.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.hooks.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the chain against `context`, stopping at the first veto
    pub fn run(&mut self, context: &mut T) -> HookOutcome {
        for (name, hook) in self.hooks.iter_mut() {
            if hook(context) == HookOutcome::Veto {
                debug!("break vetoed by hook `{name}`");
                return HookOutcome::Veto;
            }
        }
        HookOutcome::Continue
    }

    /// Move every hook of `other` into `self`, `other` winning on name clashes
    pub fn absorb(&mut self, other: BreakHooks<T>) {
        for (name, hook) in other.hooks {
            self.insert_boxed(name, hook);
        }
    }
}

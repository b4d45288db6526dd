use crate::solver::info::IterationRecord;

// ---------------------------------
// enum for managing callbacks
// ---------------------------------

#[derive(Default, Debug)]
pub(crate) enum Callback<I> {
    #[default]
    None,
    Rust(fn(&I) -> bool),
}

impl<I> Callback<I> {
    fn call(&self, info: &I) -> bool {
        match self {
            Callback::None => false,
            Callback::Rust(f) => f(info),
        }
    }
}

/// Per-iteration hook receiving the progress record
pub type IterationObserver<T> = Box<dyn FnMut(&IterationRecord<T>)>;

pub(crate) struct SolverCallbacks<T> {
    /// called once per iteration with the current record
    pub observer: Option<IterationObserver<T>>,
    /// returning true stops the solve
    pub termination_callback: Callback<IterationRecord<T>>,
}

impl<T> Default for SolverCallbacks<T> {
    fn default() -> Self {
        Self {
            observer: None,
            termination_callback: Callback::None,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SolverCallbacks<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverCallbacks")
            .field("observer", &self.observer.as_ref().map(|_| "FnMut"))
            .field("termination_callback", &self.termination_callback)
            .finish()
    }
}

impl<T> SolverCallbacks<T> {
    pub(crate) fn observe(&mut self, record: &IterationRecord<T>) {
        if let Some(observer) = self.observer.as_mut() {
            observer(record);
        }
    }

    pub(crate) fn check_termination(&self, record: &IterationRecord<T>) -> bool {
        self.termination_callback.call(record)
    }
}

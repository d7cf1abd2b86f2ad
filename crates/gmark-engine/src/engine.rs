//! Marking engine with boundary logging

use std::time::Instant;

use gmark_core::ops::{self, MatchOptions, TimestampVersioner, Versioner};
use gmark_core::rules::{SelectorValidator, StructuralValidator};
use gmark_core::{
    log_op_end, log_op_error, log_op_start, ExError, MarkedObject, MarkingError, MarkingList,
    MarkingRef, Result, SelectorList,
};
use gmark_core_types::{RequestContext, TraceId};

/// Entry point for granular marking operations
///
/// Holds the two collaborators every operation needs: the selector validator
/// (run before any marking data is read) and the versioner (which produces
/// each new snapshot). The engine holds no marking state of its own; any
/// number of threads may share one engine.
pub struct MarkingEngine {
    validator: Box<dyn SelectorValidator>,
    versioner: Box<dyn Versioner>,
    context: RequestContext,
}

impl Default for MarkingEngine {
    fn default() -> Self {
        Self::new(StructuralValidator, TimestampVersioner)
    }
}

impl std::fmt::Debug for MarkingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkingEngine")
            .field("request_id", &self.context.request_id)
            .finish_non_exhaustive()
    }
}

impl MarkingEngine {
    pub fn new(
        validator: impl SelectorValidator + 'static,
        versioner: impl Versioner + 'static,
    ) -> Self {
        Self {
            validator: Box::new(validator),
            versioner: Box::new(versioner),
            context: RequestContext::new(),
        }
    }

    /// Correlate every lifecycle event with the caller's request
    pub fn with_request_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Structured report of a failed operation
    ///
    /// Carries the stable error code plus the operation name and this engine's
    /// request and trace ids, ready for a caller's own error channel.
    pub fn error_report(&self, op: &str, err: &MarkingError) -> ExError {
        let report = ExError::from(err.clone())
            .with_op(op)
            .with_request_id(self.context.request_id.clone());
        match &self.context.trace_id {
            Some(trace_id) => report.with_trace_id(trace_id.clone()),
            None => report,
        }
    }

    /// Marking refs applying to the selectors (sorted, duplicate-free)
    ///
    /// # Errors
    /// * `InvalidSelector` - a selector fails validation
    pub fn get_markings(
        &self,
        object: &MarkedObject,
        selectors: impl Into<SelectorList>,
        options: MatchOptions,
    ) -> Result<Vec<MarkingRef>> {
        const OP: &str = "get_markings";
        let selectors = selectors.into();
        log_op_start!(
            OP,
            request_id = %self.context.request_id,
            trace_id = self.trace_id(),
            object_id = ?object.id(),
            selector_count = selectors.len() as u64,
            inherited = options.inherited,
            descendants = options.descendants
        );
        let start = Instant::now();

        let refs = ops::get_markings(self.validator.as_ref(), object, selectors, options)
            .map_err(|e| self.fail(OP, start, e))?;

        log_op_end!(
            OP,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %self.context.request_id,
            trace_id = self.trace_id(),
            marking_count = refs.len() as u64
        );
        Ok(refs)
    }

    /// Whether the selectors are marked (by every requested marking, if any)
    ///
    /// # Errors
    /// * `MissingArgument` - `selectors` is `None`
    /// * `InvalidSelector` - a selector fails validation
    pub fn is_marked(
        &self,
        object: &MarkedObject,
        marking: impl Into<MarkingList>,
        selectors: Option<SelectorList>,
        options: MatchOptions,
    ) -> Result<bool> {
        const OP: &str = "is_marked";
        let marking = marking.into();
        log_op_start!(
            OP,
            request_id = %self.context.request_id,
            trace_id = self.trace_id(),
            object_id = ?object.id(),
            marking_count = marking.as_slice().len() as u64,
            inherited = options.inherited,
            descendants = options.descendants
        );
        let start = Instant::now();

        let matched = ops::is_marked(self.validator.as_ref(), object, marking, selectors, options)
            .map_err(|e| self.fail(OP, start, e))?;

        log_op_end!(
            OP,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %self.context.request_id,
            trace_id = self.trace_id(),
            matched = matched
        );
        Ok(matched)
    }

    /// New snapshot with each marking applied to all of the selectors
    ///
    /// # Errors
    /// * `InvalidSelector` - a selector fails validation
    /// * `ObjectRevoked` / `InvalidObject` - raised by the versioner
    pub fn add_markings(
        &self,
        object: &MarkedObject,
        marking: impl Into<MarkingList>,
        selectors: impl Into<SelectorList>,
    ) -> Result<MarkedObject> {
        const OP: &str = "add_markings";
        let (marking, selectors) = (marking.into(), selectors.into());
        self.start_mutation(OP, object, &marking, &selectors);
        let start = Instant::now();

        let next = ops::add_markings(
            self.validator.as_ref(),
            self.versioner.as_ref(),
            object,
            marking,
            selectors,
        )
        .map_err(|e| self.fail(OP, start, e))?;

        self.end_mutation(OP, start, &next);
        Ok(next)
    }

    /// New snapshot without the requested (marking, selector) pairs
    ///
    /// An object carrying no markings at all is returned unchanged.
    ///
    /// # Errors
    /// * `InvalidSelector` - a selector fails validation
    /// * `MarkingNotFound` - none of the requested pairs exist
    /// * `ObjectRevoked` / `InvalidObject` - raised by the versioner
    pub fn remove_markings(
        &self,
        object: &MarkedObject,
        marking: impl Into<MarkingList>,
        selectors: impl Into<SelectorList>,
    ) -> Result<MarkedObject> {
        const OP: &str = "remove_markings";
        let (marking, selectors) = (marking.into(), selectors.into());
        self.start_mutation(OP, object, &marking, &selectors);
        let start = Instant::now();

        let next = ops::remove_markings(
            self.validator.as_ref(),
            self.versioner.as_ref(),
            object,
            marking,
            selectors,
        )
        .map_err(|e| self.fail(OP, start, e))?;

        self.end_mutation(OP, start, &next);
        Ok(next)
    }

    /// New snapshot with every marking on these exact selectors removed
    ///
    /// An object carrying no markings at all is returned unchanged.
    ///
    /// # Errors
    /// * `InvalidSelector` - a selector fails validation
    /// * `MarkingNotFound` - no stored entry carries any of the selectors
    /// * `ObjectRevoked` / `InvalidObject` - raised by the versioner
    pub fn clear_markings(
        &self,
        object: &MarkedObject,
        selectors: impl Into<SelectorList>,
    ) -> Result<MarkedObject> {
        const OP: &str = "clear_markings";
        let selectors = selectors.into();
        self.start_mutation(OP, object, &MarkingList::none(), &selectors);
        let start = Instant::now();

        let next = ops::clear_markings(
            self.validator.as_ref(),
            self.versioner.as_ref(),
            object,
            selectors,
        )
        .map_err(|e| self.fail(OP, start, e))?;

        self.end_mutation(OP, start, &next);
        Ok(next)
    }

    /// New snapshot where exactly the given markings apply to the selectors
    ///
    /// An object carrying no markings at all has nothing to clear, so `set`
    /// simply adds the markings to it.
    ///
    /// # Errors
    /// * `InvalidSelector` - a selector fails validation
    /// * `MarkingNotFound` - the object has markings but none on these selectors
    /// * `ObjectRevoked` / `InvalidObject` - raised by the versioner
    pub fn set_markings(
        &self,
        object: &MarkedObject,
        marking: impl Into<MarkingList>,
        selectors: impl Into<SelectorList>,
    ) -> Result<MarkedObject> {
        const OP: &str = "set_markings";
        let (marking, selectors) = (marking.into(), selectors.into());
        self.start_mutation(OP, object, &marking, &selectors);
        let start = Instant::now();

        let next = ops::set_markings(
            self.validator.as_ref(),
            self.versioner.as_ref(),
            object,
            marking,
            selectors,
        )
        .map_err(|e| self.fail(OP, start, e))?;

        self.end_mutation(OP, start, &next);
        Ok(next)
    }

    fn start_mutation(
        &self,
        op: &'static str,
        object: &MarkedObject,
        marking: &MarkingList,
        selectors: &SelectorList,
    ) {
        log_op_start!(
            op,
            request_id = %self.context.request_id,
            trace_id = self.trace_id(),
            object_id = ?object.id(),
            marking_count = marking.as_slice().len() as u64,
            selector_count = selectors.len() as u64
        );
    }

    fn end_mutation(&self, op: &'static str, start: Instant, next: &MarkedObject) {
        log_op_end!(
            op,
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %self.context.request_id,
            trace_id = self.trace_id(),
            entry_count = next.granular_markings().len() as u64
        );
    }

    fn trace_id(&self) -> Option<&str> {
        self.context.trace_id.as_ref().map(TraceId::as_str)
    }

    fn fail(&self, op: &'static str, start: Instant, err: MarkingError) -> MarkingError {
        log_op_error!(
            op,
            self.error_report(op, &err),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = %self.context.request_id,
            trace_id = self.trace_id()
        );
        err
    }
}

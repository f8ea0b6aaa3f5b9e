//! Pane resize controller.
//!
//! One [`ResizeController`] drives one resize handle through
//! `Idle -> Dragging -> Idle`:
//! - pointer-down resolves the governing container and the size bounds,
//!   binds global pointer listeners, forces the resize cursor, and acquires
//!   pointer capture,
//! - pointer-move writes a live [`SizeExpr`] to `<property>_calc` and points
//!   `<property>` at it,
//! - every end signal (up, cancel, lost capture, leave, liveness expiry,
//!   detach) funnels into one cleanup routine that releases the global state
//!   and then snaps `<property>` to the resolved track length.
//!
//! A second end signal for the same drag is reported as
//! [`ResizeIgnoredReason::NoActiveSession`], never as an error.

use sly_core::{Deadline, DeadlinePoll, Length, MonotonicClock};

use crate::drag::{DragAnchor, DragInput, PointerPosition, constrain_live};
use crate::error::ResizeError;
use crate::expr::SizeExpr;
use crate::host::{LayoutHost, LayoutInspector, NodeId};
use crate::options::ResizeOptions;

/// Lifecycle signal handled by one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    PointerLeave,
    LostPointerCapture,
    LivenessPoll,
    Detach,
}

/// Why a signal did not change the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeIgnoredReason {
    NoActiveSession,
    SessionAlreadyActive,
    PointerMismatch,
    /// Pointer-leave arrived but `end_on_pointer_leave` is off.
    LeaveDisabled,
    /// Liveness poll before the deadline.
    DeadlinePending,
}

/// Why a drag session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    Released,
    Cancelled,
    CaptureLost,
    PointerLeft,
    LivenessTimeout,
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Started,
    Updated,
    Ended(SessionEndReason),
    Ignored(ResizeIgnoredReason),
}

/// Result of one lifecycle dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDispatch {
    pub phase: ResizePhase,
    pub outcome: ResizeOutcome,
    pub pointer_id: Option<u32>,
    /// Expression written on a pointer-move.
    pub expression: Option<SizeExpr>,
    /// Track length the pane variable was snapped to.
    pub snapped: Option<Length>,
}

impl ResizeDispatch {
    fn ignored(phase: ResizePhase, reason: ResizeIgnoredReason, pointer_id: Option<u32>) -> Self {
        tracing::debug!(
            target: "sly.resize",
            ?phase,
            ?reason,
            pointer_id,
            "resize signal ignored"
        );
        Self {
            phase,
            outcome: ResizeOutcome::Ignored(reason),
            pointer_id,
            expression: None,
            snapped: None,
        }
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.outcome, ResizeOutcome::Ignored(_))
    }
}

/// State of an in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub pointer_id: u32,
    pub anchor: DragAnchor,
    pub container: NodeId,
    /// Pointer coordinate on the anchor axis at pointer-down.
    pub start: f64,
    pub base: Length,
    pub min: Length,
    pub max: Length,
    pub last_expression: Option<SizeExpr>,
    min_bound: SizeExpr,
    max_bound: SizeExpr,
    capture_held: bool,
}

impl DragSession {
    fn input(&self, position: PointerPosition) -> DragInput {
        DragInput {
            start: self.start,
            current: position.along(self.anchor.axis()),
            base: self.base,
            min: self.min,
            max: self.max,
            direction: self.anchor.direction(),
        }
    }
}

/// Drives one resize handle.
///
/// The controller owns no host state. Every side effect goes through the
/// host passed to each call, so a host that drops the controller mid-drag
/// must call [`ResizeController::detach`] first.
#[derive(Debug, Clone)]
pub struct ResizeController<C: MonotonicClock> {
    handle: NodeId,
    options: ResizeOptions,
    clock: C,
    deadline: Deadline,
    session: Option<DragSession>,
}

impl<C: MonotonicClock> ResizeController<C> {
    #[must_use]
    pub fn new(handle: NodeId, options: ResizeOptions, clock: C) -> Self {
        let deadline = Deadline::new(options.liveness_timeout());
        Self {
            handle,
            options,
            clock,
            deadline,
            session: None,
        }
    }

    #[must_use]
    pub const fn handle(&self) -> NodeId {
        self.handle
    }

    #[must_use]
    pub const fn options(&self) -> &ResizeOptions {
        &self.options
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Monotonic time at which [`Self::poll`] will end the drag, if armed.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<std::time::Duration> {
        self.deadline.expires_at()
    }

    /// Start a drag.
    ///
    /// Fails without touching the host when the container or a bound cannot
    /// be resolved. A session whose liveness deadline already passed is ended
    /// first, so the new drag starts from the snapped size.
    pub fn pointer_down<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer_id: u32,
        position: PointerPosition,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Some(expired) = self.expire_if_due(host, ResizePhase::PointerDown) {
            expired?;
        }
        if self.session.is_some() {
            return Ok(ResizeDispatch::ignored(
                ResizePhase::PointerDown,
                ResizeIgnoredReason::SessionAlreadyActive,
                Some(pointer_id),
            ));
        }

        let container = self.container(&*host)?;
        let (base, _) = self.resolve_bound(&*host, container, &self.options.property, None)?;
        let (min, min_bound) = self.resolve_bound(
            &*host,
            container,
            &self.options.min_variable(),
            self.options.fallback_min,
        )?;
        let (max, max_bound) = self.resolve_bound(
            &*host,
            container,
            &self.options.max_variable(),
            self.options.fallback_max,
        )?;

        let anchor = self.options.anchor;
        self.deadline.arm(self.clock.now_mono());
        host.bind_pointer_listeners(self.handle);
        host.override_global_cursor(self.options.cursor_icon());
        host.set_pointer_capture(self.handle, pointer_id);

        self.session = Some(DragSession {
            pointer_id,
            anchor,
            container,
            start: position.along(anchor.axis()),
            base,
            min,
            max,
            last_expression: None,
            min_bound,
            max_bound,
            capture_held: true,
        });
        tracing::debug!(
            target: "sly.resize",
            handle = %self.handle,
            %container,
            pointer_id,
            %base,
            %min,
            %max,
            "drag started"
        );
        Ok(ResizeDispatch {
            phase: ResizePhase::PointerDown,
            outcome: ResizeOutcome::Started,
            pointer_id: Some(pointer_id),
            expression: None,
            snapped: None,
        })
    }

    /// Update the live size expression.
    ///
    /// A move that arrives after the liveness deadline ends the drag with
    /// [`SessionEndReason::LivenessTimeout`] instead of reviving it.
    pub fn pointer_move<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer_id: u32,
        position: PointerPosition,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Some(expired) = self.expire_if_due(host, ResizePhase::PointerMove) {
            return expired;
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(ResizeDispatch::ignored(
                ResizePhase::PointerMove,
                ResizeIgnoredReason::NoActiveSession,
                Some(pointer_id),
            ));
        };
        if session.pointer_id != pointer_id {
            return Ok(ResizeDispatch::ignored(
                ResizePhase::PointerMove,
                ResizeIgnoredReason::PointerMismatch,
                Some(pointer_id),
            ));
        }

        self.deadline.arm(self.clock.now_mono());
        let expression = constrain_live(
            &session.input(position),
            session.min_bound.clone(),
            session.max_bound.clone(),
        );
        let calc = self.options.calc_variable();
        host.set_variable(session.container, &calc, expression.clone().into());
        host.set_variable(
            session.container,
            &self.options.property,
            SizeExpr::var(calc).into(),
        );
        session.last_expression = Some(expression.clone());
        tracing::trace!(
            target: "sly.resize",
            pointer_id,
            expression = %expression,
            "drag updated"
        );
        Ok(ResizeDispatch {
            phase: ResizePhase::PointerMove,
            outcome: ResizeOutcome::Updated,
            pointer_id: Some(pointer_id),
            expression: Some(expression),
            snapped: None,
        })
    }

    /// End the drag on pointer-up.
    pub fn pointer_up<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer_id: u32,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Some(expired) = self.expire_if_due(host, ResizePhase::PointerUp) {
            return expired;
        }
        if let Some(dispatch) = self.reject_pointer(ResizePhase::PointerUp, Some(pointer_id)) {
            return Ok(dispatch);
        }
        self.finish_session(
            host,
            ResizePhase::PointerUp,
            SessionEndReason::Released,
            Some(pointer_id),
        )
    }

    /// End the drag on pointer-cancel. `None` cancels whatever pointer is
    /// active.
    pub fn pointer_cancel<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer_id: Option<u32>,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Some(expired) = self.expire_if_due(host, ResizePhase::PointerCancel) {
            return expired;
        }
        if let Some(dispatch) = self.reject_pointer(ResizePhase::PointerCancel, pointer_id) {
            return Ok(dispatch);
        }
        self.finish_session(
            host,
            ResizePhase::PointerCancel,
            SessionEndReason::Cancelled,
            pointer_id,
        )
    }

    /// End the drag when the host reports that capture was taken away.
    pub fn lost_pointer_capture<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer_id: u32,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Some(dispatch) =
            self.reject_pointer(ResizePhase::LostPointerCapture, Some(pointer_id))
        {
            return Ok(dispatch);
        }
        if let Some(session) = self.session.as_mut() {
            session.capture_held = false;
        }
        if let Some(expired) = self.expire_if_due(host, ResizePhase::LostPointerCapture) {
            return expired;
        }
        self.finish_session(
            host,
            ResizePhase::LostPointerCapture,
            SessionEndReason::CaptureLost,
            Some(pointer_id),
        )
    }

    /// End the drag when the pointer leaves the window, if enabled.
    pub fn pointer_leave<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        pointer_id: u32,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Some(expired) = self.expire_if_due(host, ResizePhase::PointerLeave) {
            return expired;
        }
        if let Some(dispatch) = self.reject_pointer(ResizePhase::PointerLeave, Some(pointer_id)) {
            return Ok(dispatch);
        }
        if !self.options.end_on_pointer_leave {
            return Ok(ResizeDispatch::ignored(
                ResizePhase::PointerLeave,
                ResizeIgnoredReason::LeaveDisabled,
                Some(pointer_id),
            ));
        }
        self.finish_session(
            host,
            ResizePhase::PointerLeave,
            SessionEndReason::PointerLeft,
            Some(pointer_id),
        )
    }

    /// Check the liveness deadline against the clock.
    ///
    /// Ends the drag exactly once when no pointer activity was seen for the
    /// configured timeout.
    pub fn poll<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<ResizeDispatch, ResizeError> {
        if let Some(expired) = self.expire_if_due(host, ResizePhase::LivenessPoll) {
            return expired;
        }
        let pointer_id = self.session.as_ref().map(|session| session.pointer_id);
        let reason = if pointer_id.is_some() {
            ResizeIgnoredReason::DeadlinePending
        } else {
            ResizeIgnoredReason::NoActiveSession
        };
        Ok(ResizeDispatch::ignored(
            ResizePhase::LivenessPoll,
            reason,
            pointer_id,
        ))
    }

    /// End any active drag before the handle goes away.
    pub fn detach<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<ResizeDispatch, ResizeError> {
        self.finish_session(host, ResizePhase::Detach, SessionEndReason::Detached, None)
    }

    /// End the session with [`SessionEndReason::LivenessTimeout`] when the
    /// clock has passed its deadline, whichever signal notices first.
    fn expire_if_due<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        phase: ResizePhase,
    ) -> Option<Result<ResizeDispatch, ResizeError>> {
        let pointer_id = self.session.as_ref()?.pointer_id;
        if self.deadline.poll(self.clock.now_mono()) != DeadlinePoll::Expired {
            return None;
        }
        tracing::warn!(
            target: "sly.resize",
            handle = %self.handle,
            pointer_id,
            ?phase,
            timeout_ms = self.options.liveness_timeout_ms,
            "no pointer activity before liveness deadline; ending drag"
        );
        Some(self.finish_session(
            host,
            phase,
            SessionEndReason::LivenessTimeout,
            Some(pointer_id),
        ))
    }

    fn reject_pointer(&self, phase: ResizePhase, pointer_id: Option<u32>) -> Option<ResizeDispatch> {
        let Some(session) = self.session.as_ref() else {
            return Some(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::NoActiveSession,
                pointer_id,
            ));
        };
        match pointer_id {
            Some(id) if id != session.pointer_id => Some(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::PointerMismatch,
                pointer_id,
            )),
            _ => None,
        }
    }

    fn finish_session<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        phase: ResizePhase,
        reason: SessionEndReason,
        pointer_id: Option<u32>,
    ) -> Result<ResizeDispatch, ResizeError> {
        let Some(session) = self.session.take() else {
            return Ok(ResizeDispatch::ignored(
                phase,
                ResizeIgnoredReason::NoActiveSession,
                pointer_id,
            ));
        };

        self.deadline.clear();
        host.unbind_pointer_listeners(self.handle);
        host.restore_global_cursor();
        if session.capture_held {
            host.release_pointer_capture(self.handle, session.pointer_id);
        }

        let calc = self.options.calc_variable();
        match self.snap(&*host, &session) {
            Ok((container, length)) => {
                host.set_variable(container, &self.options.property, length.into());
                if container != session.container {
                    host.remove_variable(session.container, &calc);
                }
                host.remove_variable(container, &calc);
                tracing::debug!(
                    target: "sly.resize",
                    handle = %self.handle,
                    pointer_id = session.pointer_id,
                    ?reason,
                    snapped = %length,
                    "drag ended"
                );
                Ok(ResizeDispatch {
                    phase,
                    outcome: ResizeOutcome::Ended(reason),
                    pointer_id: Some(session.pointer_id),
                    expression: session.last_expression,
                    snapped: Some(length),
                })
            }
            Err(err) => {
                if let Some(expression) = session.last_expression {
                    host.set_variable(session.container, &self.options.property, expression.into());
                }
                host.remove_variable(session.container, &calc);
                tracing::debug!(
                    target: "sly.resize",
                    handle = %self.handle,
                    pointer_id = session.pointer_id,
                    ?reason,
                    error = %err,
                    "drag ended without snapping"
                );
                Err(err)
            }
        }
    }

    /// Resolved track length of the pane, read while `<property>_calc` is
    /// still in place.
    fn snap<H: LayoutInspector + ?Sized>(
        &self,
        host: &H,
        session: &DragSession,
    ) -> Result<(NodeId, Length), ResizeError> {
        let container = self.container(host)?;
        let index = host
            .child_index(container, self.handle)
            .ok_or(ResizeError::DescendantNotFound {
                container,
                node: self.handle,
            })?;
        let tracks = host.resolved_tracks(container, session.anchor.axis());
        let length = tracks
            .get(index)
            .copied()
            .ok_or(ResizeError::TrackOutOfRange {
                index,
                tracks: tracks.len(),
            })?;
        Ok((container, length))
    }

    fn container<H: LayoutInspector + ?Sized>(&self, host: &H) -> Result<NodeId, ResizeError> {
        host.closest(self.handle, &self.options.container_selector)
            .ok_or_else(|| ResizeError::MissingContainer {
                selector: self.options.container_selector.clone(),
            })
    }

    /// Current value of `variable`, plus the expression the live formula
    /// should use for it: a `var()` reference when the variable resolves,
    /// else the fallback literal.
    fn resolve_bound<H: LayoutInspector + ?Sized>(
        &self,
        host: &H,
        container: NodeId,
        variable: &str,
        fallback: Option<Length>,
    ) -> Result<(Length, SizeExpr), ResizeError> {
        match (host.resolved_variable(container, variable), fallback) {
            (Some(length), _) => Ok((length, SizeExpr::var(variable))),
            (None, Some(length)) => Ok((length, SizeExpr::Length(length))),
            (None, None) => Err(ResizeError::UnresolvedBound {
                variable: variable.to_string(),
            }),
        }
    }
}

// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/drag/coordinator.rs
//
// Drag coordinator: owns the registry and the single drag session, and turns
// pointer input into press, long-press, drag and drop transitions.
//
// # State Machine
//
//   Idle --down--> Pressing --timer--> (EditRequested) Idle
//                     |  \--up--> (Clicked) Idle
//                     \--move past threshold--> Dragging
//   Dragging --up over container--> (Dropped) Idle
//   Dragging --up elsewhere / cancel--> (Cancelled) Idle
//
// # Invariants
//
// 1. At most one session exists; a press while one is live is ignored.
// 2. Drag and click never both fire for the same press.
// 3. Timer ids are unique per press; stale timers never fire.
// 4. Native file drags never touch the session.

use std::time::Instant;

use super::file_drop::{FileDropListener, NativeDragEvent};
use super::input::{Point, PointerButton, PointerEvent};
use super::registry::{insertion_index, item_at, ContainerRegistry};
use super::session::{
    DragConfig, DragPhase, DragSession, LongPressTimer, Mirror, SessionState, TimerId,
};
use super::signal::{CancelReason, DragSignal, DropEvent, DropTarget, FileDrop, ItemPress};
use crate::domain::board::{ContainerId, ItemId};

/// Top-level owner of drag state.
#[derive(Debug, Default)]
pub struct DragCoordinator {
    registry: ContainerRegistry,
    config: DragConfig,
    session: Option<DragSession>,
    files: FileDropListener,
    next_timer: u64,
}

impl DragCoordinator {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ContainerRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }

    pub fn phase(&self) -> DragPhase {
        self.session.as_ref().map_or(DragPhase::Idle, DragSession::phase)
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn mirror(&self) -> Option<&Mirror> {
        self.session.as_ref().and_then(DragSession::mirror)
    }

    /// Whether `item` is the one currently being dragged (render it dimmed).
    pub fn is_in_transition(&self, item: ItemId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.item == item && s.phase() == DragPhase::Dragging)
    }

    /// Long-press timer the host should schedule, if a press is pending.
    pub fn pending_timer(&self) -> Option<LongPressTimer> {
        self.session.as_ref().and_then(DragSession::timer)
    }

    /// Container file drags are currently hovering.
    pub fn file_hover(&self) -> Option<&ContainerId> {
        self.files.hover()
    }

    /// Primary-button press. Starts a session if it lands on an item of a
    /// registered container.
    pub fn pointer_down(&mut self, event: &PointerEvent, now: Instant) -> Vec<DragSignal> {
        if event.button != PointerButton::Primary {
            return Vec::new();
        }
        if self.session.is_some() {
            log::debug!("Ignoring press while a drag session is active");
            return Vec::new();
        }

        let Some(container) = self.registry.find_container_at(event.position).cloned() else {
            return Vec::new();
        };
        let Some(surface) = self.registry.surface(&container) else {
            return Vec::new();
        };
        let Some((index, item, item_rect)) = item_at(&surface.slots(), event.position) else {
            return Vec::new();
        };

        self.next_timer += 1;
        let timer = LongPressTimer {
            id: TimerId(self.next_timer),
            deadline: now + self.config.long_press,
        };
        let press = ItemPress {
            item,
            container,
            index,
        };
        log::debug!("Press on {item} at {}[{index}]", press.container);

        self.session = Some(DragSession::press(
            press.clone(),
            event.pointer,
            event.position,
            item_rect,
            timer,
        ));
        vec![DragSignal::PressStarted(press)]
    }

    /// Pointer motion at `now`. A press whose long-press deadline has
    /// already passed resolves as a long press, however late the timer
    /// itself is delivered.
    pub fn pointer_move(&mut self, event: &PointerEvent, now: Instant) -> Vec<DragSignal> {
        if !self.owns_pointer(event) {
            return Vec::new();
        }
        if let Some(signals) = self.expire_long_press(now) {
            return signals;
        }
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(2);
        if session.phase() == DragPhase::Pressing {
            if !session.exceeds_threshold(event.position, self.config.drag_threshold) {
                return out;
            }
            let start = session.drag_start();
            if let Some(session) = self.session.as_mut() {
                session.begin_drag(event.position);
            }
            if let Some(handler) = self.registry.handler_mut(&start.from_container) {
                handler.on_drag_start(&start);
            }
            log::debug!(
                "Drag started for {} from {}[{}]",
                start.item,
                start.from_container,
                start.from_index
            );
            out.push(DragSignal::DragStarted(start));
        }

        let target = self
            .session
            .as_ref()
            .and_then(|s| self.drop_target_at(event.position, s.item));
        if let Some(session) = self.session.as_mut() {
            session.update_drag(event.position, target.clone());
        }
        out.push(DragSignal::DragMoved {
            position: event.position,
            target,
        });
        out
    }

    pub fn pointer_up(&mut self, event: &PointerEvent, now: Instant) -> Vec<DragSignal> {
        if event.button != PointerButton::Primary || !self.owns_pointer(event) {
            return Vec::new();
        }
        if let Some(signals) = self.expire_long_press(now) {
            return signals;
        }
        let Some(session) = self.session.take() else {
            return Vec::new();
        };

        match session.state {
            SessionState::Pressing { .. } => {
                let press = session.item_press();
                if let Some(handler) = self.registry.handler_mut(&press.container) {
                    handler.on_click(&press);
                }
                vec![DragSignal::Clicked(press)]
            }
            SessionState::Dragging { .. } => {
                let Some(target) = self.drop_target_at(event.position, session.item) else {
                    return self.finish_cancel(&session, CancelReason::NoTarget);
                };

                let drop = DropEvent {
                    item: session.item,
                    from_container: session.from_container.clone(),
                    from_index: session.from_index,
                    to_container: target.container,
                    to_index: target.index,
                };
                if let Some(handler) = self.registry.handler_mut(&drop.to_container) {
                    handler.on_drop(&drop);
                }
                if let Some(handler) = self.registry.handler_mut(&session.from_container) {
                    handler.on_drag_end(&session.drag_end(true));
                }
                log::debug!(
                    "Dropped {} from {}[{}] on {}[{}]",
                    drop.item,
                    drop.from_container,
                    drop.from_index,
                    drop.to_container,
                    drop.to_index
                );
                vec![DragSignal::Dropped(drop)]
            }
        }
    }

    /// Platform cancelled the pointer stream (touch interrupted, capture lost).
    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> Vec<DragSignal> {
        if self.owns_pointer(event) {
            return self.cancel(CancelReason::PointerCancelled);
        }
        Vec::new()
    }

    /// Abort any press or drag without touching a list.
    ///
    /// Hosts must call this themselves when something should interrupt a
    /// drag (opening a modal, Escape); focus loss does not cancel.
    pub fn cancel(&mut self, reason: CancelReason) -> Vec<DragSignal> {
        match self.session.take() {
            Some(session) => self.finish_cancel(&session, reason),
            None => Vec::new(),
        }
    }

    /// A host timer scheduled from [`pending_timer`](Self::pending_timer)
    /// fired.
    pub fn on_timer(&mut self, id: TimerId) -> Vec<DragSignal> {
        if self.pending_timer().is_none_or(|timer| timer.id != id) {
            return Vec::new();
        }
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        let press = session.item_press();
        log::debug!("Long press on {} at {}[{}]", press.item, press.container, press.index);
        vec![DragSignal::EditRequested(press)]
    }

    /// Poll the pending long-press deadline (for hosts that tick instead of
    /// scheduling timers).
    pub fn tick(&mut self, now: Instant) -> Vec<DragSignal> {
        self.expire_long_press(now).unwrap_or_default()
    }

    /// Route a native drag event to the file drop listener. Drags without a
    /// file payload are not intercepted.
    pub fn handle_native_drag(&mut self, event: &NativeDragEvent) -> Option<FileDrop> {
        self.files.handle(&mut self.registry, event)
    }

    fn owns_pointer(&self, event: &PointerEvent) -> bool {
        self.session.as_ref().is_some_and(|s| s.pointer == event.pointer)
    }

    /// Fire a pending long press whose deadline is at or before `now`.
    fn expire_long_press(&mut self, now: Instant) -> Option<Vec<DragSignal>> {
        let timer = self.pending_timer().filter(|timer| timer.is_due(now))?;
        Some(self.on_timer(timer.id))
    }

    fn finish_cancel(&mut self, session: &DragSession, reason: CancelReason) -> Vec<DragSignal> {
        if session.phase() == DragPhase::Dragging {
            if let Some(handler) = self.registry.handler_mut(&session.from_container) {
                handler.on_drag_end(&session.drag_end(false));
            }
        }
        log::debug!("Drag of {} cancelled: {reason:?}", session.item);
        vec![DragSignal::Cancelled {
            item: session.item,
            reason,
        }]
    }

    fn drop_target_at(&self, point: Point, dragged: ItemId) -> Option<DropTarget> {
        let container = self.registry.find_container_at(point)?;
        let surface = self.registry.surface(container)?;
        let index = insertion_index(&surface.slots(), surface.axis(), point, dragged);
        Some(DropTarget {
            container: container.clone(),
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::app::drag::input::{PointerId, Rect};
    use crate::app::drag::registry::{ContainerHandler, ContainerSurface, ListAxis, Slot};
    use crate::app::drag::signal::{DragEnd, DragStart};

    #[derive(Default)]
    struct Calls(Vec<String>);

    struct Row {
        bounds: Rect,
        items: Vec<u64>,
    }

    impl ContainerSurface for Row {
        fn bounds(&self) -> Rect {
            self.bounds
        }

        fn slots(&self) -> Vec<Slot> {
            self.items
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    Slot::item(
                        ItemId(*id),
                        Rect::new(self.bounds.x + i as f32 * 20.0, self.bounds.y, 20.0, 20.0),
                    )
                })
                .collect()
        }

        fn axis(&self) -> ListAxis {
            ListAxis::Horizontal
        }
    }

    struct Spy(&'static str, Rc<RefCell<Calls>>);

    impl ContainerHandler for Spy {
        fn on_drop(&mut self, event: &DropEvent) {
            self.1.borrow_mut().0.push(format!(
                "{}:drop {}@{}->{}",
                self.0, event.item.0, event.from_index, event.to_index
            ));
        }

        fn on_drag_start(&mut self, event: &DragStart) {
            self.1.borrow_mut().0.push(format!("{}:start {}", self.0, event.item.0));
        }

        fn on_drag_end(&mut self, event: &DragEnd) {
            self.1
                .borrow_mut()
                .0
                .push(format!("{}:end {}", self.0, event.dropped));
        }

        fn on_click(&mut self, press: &ItemPress) {
            self.1.borrow_mut().0.push(format!("{}:click {}", self.0, press.item.0));
        }
    }

    fn coordinator() -> (DragCoordinator, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut coordinator = DragCoordinator::new(DragConfig::default());
        coordinator.registry_mut().register(
            ContainerId::from("s"),
            Box::new(Row {
                bounds: Rect::new(0.0, 0.0, 200.0, 20.0),
                items: vec![1, 2, 3],
            }),
            Box::new(Spy("s", calls.clone())),
        );
        coordinator.registry_mut().register(
            ContainerId::from("a"),
            Box::new(Row {
                bounds: Rect::new(0.0, 40.0, 200.0, 20.0),
                items: vec![10],
            }),
            Box::new(Spy("a", calls.clone())),
        );
        (coordinator, calls)
    }

    fn press(x: f32, y: f32) -> PointerEvent {
        PointerEvent::primary(x, y)
    }

    #[test]
    fn press_and_release_is_a_click() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        let out = c.pointer_down(&press(25.0, 5.0), now);
        assert!(matches!(&out[..], [DragSignal::PressStarted(p)] if p.item == ItemId(2) && p.index == 1));
        assert_eq!(c.phase(), DragPhase::Pressing);

        let out = c.pointer_up(&press(26.0, 6.0), now);
        assert!(matches!(&out[..], [DragSignal::Clicked(_)]));
        assert_eq!(c.phase(), DragPhase::Idle);
        assert_eq!(calls.borrow().0, vec!["s:click 2"]);
    }

    #[test]
    fn holding_still_requests_edit() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);

        assert!(c.tick(now + Duration::from_millis(100)).is_empty());
        let out = c.tick(now + Duration::from_millis(500));
        assert!(matches!(&out[..], [DragSignal::EditRequested(p)] if p.item == ItemId(1)));
        assert_eq!(c.phase(), DragPhase::Idle);

        // Release after the long press is not a click.
        assert!(c.pointer_up(&press(5.0, 5.0), now).is_empty());
        assert!(calls.borrow().0.is_empty());
    }

    #[test]
    fn late_move_resolves_as_long_press() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);

        // The deadline passed before the host ticked; the move comes first.
        let out = c.pointer_move(&press(30.0, 5.0), now + Duration::from_millis(600));
        assert!(matches!(&out[..], [DragSignal::EditRequested(p)] if p.item == ItemId(1)));
        assert_eq!(c.phase(), DragPhase::Idle);
        assert!(c.tick(now + Duration::from_millis(700)).is_empty());
        assert!(calls.borrow().0.is_empty());
    }

    #[test]
    fn late_release_resolves_as_long_press() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(25.0, 5.0), now);

        let out = c.pointer_up(&press(25.0, 5.0), now + Duration::from_millis(500));
        assert!(matches!(&out[..], [DragSignal::EditRequested(p)] if p.item == ItemId(2)));
        assert!(calls.borrow().0.is_empty());
    }

    #[test]
    fn move_before_deadline_still_drags() {
        let (mut c, _) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);
        let out = c.pointer_move(&press(30.0, 5.0), now + Duration::from_millis(499));
        assert!(matches!(out.first(), Some(DragSignal::DragStarted(_))));
        // Once dragging, the deadline no longer matters.
        let out = c.pointer_up(&press(30.0, 5.0), now + Duration::from_secs(2));
        assert!(matches!(out.first(), Some(DragSignal::Dropped(_))));
    }

    #[test]
    fn stale_timer_does_not_fire() {
        let (mut c, _) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);
        let first = c.pending_timer().unwrap().id;
        c.pointer_up(&press(5.0, 5.0), now);

        c.pointer_down(&press(25.0, 5.0), now);
        assert!(c.on_timer(first).is_empty());
        assert_eq!(c.phase(), DragPhase::Pressing);

        let second = c.pending_timer().unwrap().id;
        assert_ne!(first, second);
        assert_eq!(c.on_timer(second).len(), 1);
    }

    #[test]
    fn moving_past_threshold_starts_drag_and_cancels_timer() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);

        assert!(c.pointer_move(&press(7.0, 6.0), now).is_empty());
        let out = c.pointer_move(&press(15.0, 5.0), now);
        assert!(matches!(out.first(), Some(DragSignal::DragStarted(s)) if s.item == ItemId(1)));
        assert_eq!(c.phase(), DragPhase::Dragging);
        assert!(c.pending_timer().is_none());
        assert!(c.is_in_transition(ItemId(1)));
        assert!(c.tick(now + Duration::from_secs(5)).is_empty());
        assert_eq!(calls.borrow().0, vec!["s:start 1"]);
    }

    #[test]
    fn drag_reports_hover_target() {
        let (mut c, _) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);
        c.pointer_move(&press(15.0, 5.0), now);

        let out = c.pointer_move(&press(45.0, 5.0), now);
        let expected = DropTarget {
            container: ContainerId::from("s"),
            index: 1,
        };
        assert!(matches!(&out[..], [DragSignal::DragMoved { target: Some(t), .. }] if *t == expected));

        let mirror = c.mirror().copied().unwrap();
        assert_eq!(mirror.position, Point::new(40.0, 0.0));

        let out = c.pointer_move(&press(45.0, 30.0), now);
        assert!(matches!(&out[..], [DragSignal::DragMoved { target: None, .. }]));
    }

    #[test]
    fn drop_in_other_container_dispatches_to_destination() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(25.0, 5.0), now);
        c.pointer_move(&press(25.0, 30.0), now);
        let out = c.pointer_up(&press(25.0, 45.0), now);

        let Some(DragSignal::Dropped(drop)) = out.first() else {
            panic!("expected drop, got {out:?}");
        };
        assert_eq!(drop.from_container, ContainerId::from("s"));
        assert_eq!(drop.from_index, 1);
        assert_eq!(drop.to_container, ContainerId::from("a"));
        assert_eq!(drop.to_index, 1);
        assert!(!drop.is_reorder());
        assert_eq!(
            calls.borrow().0,
            vec!["s:start 2", "a:drop 2@1->1", "s:end true"]
        );
        assert_eq!(c.phase(), DragPhase::Idle);
    }

    #[test]
    fn release_outside_containers_cancels() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);
        c.pointer_move(&press(5.0, 100.0), now);
        let out = c.pointer_up(&press(5.0, 100.0), now);
        assert_eq!(
            out,
            vec![DragSignal::Cancelled {
                item: ItemId(1),
                reason: CancelReason::NoTarget
            }]
        );
        assert_eq!(calls.borrow().0, vec!["s:start 1", "s:end false"]);
    }

    #[test]
    fn external_cancel_restores_idle_without_drop() {
        let (mut c, calls) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);
        c.pointer_move(&press(50.0, 5.0), now);
        let out = c.cancel(CancelReason::External);
        assert_eq!(out.len(), 1);
        assert!(c.mirror().is_none());
        assert!(!c.is_in_transition(ItemId(1)));
        assert!(c.pointer_up(&press(50.0, 5.0), now).is_empty());
        assert_eq!(calls.borrow().0, vec!["s:start 1", "s:end false"]);
    }

    #[test]
    fn second_press_is_ignored_while_session_is_live() {
        let (mut c, _) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);
        let touch = press(25.0, 5.0).with_pointer(PointerId(7));
        assert!(c.pointer_down(&touch, now).is_empty());
        assert_eq!(c.session().map(|s| s.item), Some(ItemId(1)));

        // Other pointers cannot steer the session either.
        assert!(c.pointer_move(&press(90.0, 5.0).with_pointer(PointerId(7)), now).is_empty());
        assert!(c.pointer_up(&touch, now).is_empty());
        assert_eq!(c.phase(), DragPhase::Pressing);
    }

    #[test]
    fn non_primary_buttons_and_empty_space_are_ignored() {
        let (mut c, _) = coordinator();
        let now = Instant::now();
        let right = press(5.0, 5.0).with_button(PointerButton::Secondary);
        assert!(c.pointer_down(&right, now).is_empty());
        assert!(c.pointer_down(&press(150.0, 5.0), now).is_empty());
        assert!(c.pointer_down(&press(5.0, 30.0), now).is_empty());
        assert_eq!(c.phase(), DragPhase::Idle);
    }

    #[test]
    fn pointer_cancel_aborts_press() {
        let (mut c, _) = coordinator();
        let now = Instant::now();
        c.pointer_down(&press(5.0, 5.0), now);
        let out = c.pointer_cancel(&press(5.0, 5.0));
        assert!(matches!(
            &out[..],
            [DragSignal::Cancelled { reason: CancelReason::PointerCancelled, .. }]
        ));
        assert_eq!(c.phase(), DragPhase::Idle);
    }
}

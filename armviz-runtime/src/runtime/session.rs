use std::{path::PathBuf, sync::Arc};

use armviz_core::{
    algorithm::ReachClamper, CoordinateMapper, JointAngles, LinkLengths, Point,
};
use tokio::sync::mpsc;

use crate::{
    planner::{PlanRequest, Planner},
    playback::{ClockSource, PlaybackController, Ticket},
    render::{Frame, Renderer, SvgSurface, View},
    trace::{CsvTracer, NullTracer, Tracer},
    Config,
};

use super::Event;

/// Single viewer session.
///
/// The session applies events to the playback controller and renders the
/// result after every accepted transition.
pub struct Session {
    controller: PlaybackController,
    lengths: LinkLengths,
    duration: f32,
    dt: f32,
    renderer: Renderer,
    planner: Arc<dyn Planner>,
    tx: mpsc::Sender<Event>,
    tracer: Box<dyn Tracer + Send>,
    frame_path: Option<PathBuf>,
    surface: SvgSurface,
    view: View,
}

impl Session {
    /// Construct a session.
    ///
    /// Planner responses are posted on the event queue. Without a clock
    /// source the caller is responsible for delivering ticks.
    pub fn new(
        config: &Config,
        planner: Arc<dyn Planner>,
        tx: mpsc::Sender<Event>,
        clock_source: Option<ClockSource>,
    ) -> super::Result<Self> {
        let controller = match clock_source {
            Some(source) => PlaybackController::with_clock(JointAngles::HOME, source),
            None => PlaybackController::new(JointAngles::HOME),
        };

        let mut tracer: Box<dyn Tracer + Send> = Box::new(NullTracer);
        let mut frame_path = None;

        if let Some(directory) = &config.output.directory {
            std::fs::create_dir_all(directory)?;

            frame_path = Some(directory.join(crate::consts::FRAME_FILE_NAME));

            if config.output.trace {
                tracer = Box::new(CsvTracer::from_path(directory));
            }
        }

        let renderer = Renderer::new(CoordinateMapper::new(
            config.canvas.width,
            config.canvas.height,
        ));

        let lengths = config.arm.lengths();

        let view = renderer.render(&Frame {
            angles: controller.display_angles(),
            lengths,
            trajectory: controller.trajectory(),
            target: None,
            frame: None,
            dimmed: false,
        });

        Ok(Self {
            controller,
            lengths,
            duration: config.arm.duration(),
            dt: config.arm.dt,
            renderer,
            planner,
            tx,
            tracer,
            frame_path,
            surface: SvgSurface::new(),
            view,
        })
    }

    #[inline]
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    #[inline]
    pub fn lengths(&self) -> LinkLengths {
        self.lengths
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Last rendered view.
    #[inline]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Apply an event.
    ///
    /// Returns `false` when the session should stop.
    pub fn handle(&mut self, event: Event) -> bool {
        let accepted = match event {
            Event::Click { x, y } => self.click(Point::new(x, y)),
            Event::HoverEnter(frame) | Event::HoverMove(frame) => self.controller.hover(frame),
            Event::HoverAt(time) => self.hover_at(time),
            Event::HoverLeave => self.controller.leave(),
            Event::Reset => {
                self.controller.reset();
                log::debug!("Reset to {}", JointAngles::HOME);
                true
            }
            Event::SetLengths(lengths) => self.set_lengths(lengths),
            Event::SetDuration(duration) => self.set_duration(duration),
            Event::Status => {
                self.status();
                false
            }
            Event::Tick { epoch } => self.controller.tick(epoch),
            Event::Planned { ticket, result } => self.planned(ticket, result),
            Event::Shutdown => {
                self.controller.stop();
                return false;
            }
        };

        if accepted {
            self.render();
        }

        true
    }

    fn click(&mut self, canvas: Point) -> bool {
        let clamper = ReachClamper::from(&self.lengths);

        let point = self.renderer.mapper().to_robot(&canvas);
        let target = clamper.clamp(point);

        if !clamper.is_reachable(&point) {
            log::debug!(
                "Target [{:.2}, {:.2}] clamped to [{:.2}, {:.2}]",
                point.x,
                point.y,
                target.x,
                target.y
            );
        }

        let ticket = match self.controller.request(target) {
            Some(ticket) => ticket,
            None => return false,
        };

        let request = PlanRequest::new(
            &self.controller.committed_angles(),
            &target,
            &self.lengths,
            self.duration,
            self.dt,
        );

        log::debug!("Plan {}: {}", ticket, request);

        let planner = self.planner.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = planner
                .plan(&request)
                .await
                .map(|plan| {
                    if let Some(goal) = plan.goal {
                        log::debug!("Plan {} goal {}", ticket, goal);
                    }
                    plan.trajectory
                })
                .map_err(|e| {
                    log::debug!("Plan {} failed: {}", ticket, e);
                    e.message()
                });

            if tx.send(Event::Planned { ticket, result }).await.is_err() {
                log::debug!("Plan {} dropped, runtime stopped", ticket);
            }
        });

        true
    }

    /// Scrub to the frame under a point on the chart time axis.
    fn hover_at(&mut self, time: f32) -> bool {
        match self.view.charts.effector.frame_at(time) {
            Some(frame) => {
                log::trace!("Chart time {:.3}s at frame {}", time, frame);
                self.controller.hover(frame)
            }
            None => false,
        }
    }

    fn planned(&mut self, ticket: Ticket, result: Result<armviz_core::Trajectory, String>) -> bool {
        if !self.controller.complete(ticket, result) {
            return false;
        }

        if self.controller.is_animating() {
            if let Err(e) = self.tracer.write_trajectory(self.controller.trajectory()) {
                log::error!("Failed to write trace: {}", e);
            }
        }

        true
    }

    fn set_lengths(&mut self, lengths: LinkLengths) -> bool {
        if self.controller.is_animating() {
            log::warn!("Link lengths are locked during animation");
            return false;
        }

        self.lengths = LinkLengths::clamped(lengths.l1, lengths.l2, lengths.l3);

        log::debug!("Link lengths {}", self.lengths);

        true
    }

    fn set_duration(&mut self, duration: f32) -> bool {
        if self.controller.is_animating() {
            log::warn!("Duration is locked during animation");
            return false;
        }

        let range = crate::consts::DURATION_RANGE;
        self.duration = duration.clamp(*range.start(), *range.end());

        log::debug!("Duration {:.2}s", self.duration);

        // Duration is not part of the scene.
        false
    }

    fn status(&self) {
        log::info!("{} {}", self.controller.state(), self.lengths);
        log::info!("{}", self.view.readout);

        if let Some(target) = self.controller.target() {
            log::info!("Target [{:.2}, {:.2}]", target.x, target.y);
        }
        if !self.controller.trajectory().is_empty() {
            log::info!("Trajectory {}", self.controller.trajectory());
        }
        if let Some(error) = self.controller.error() {
            log::error!("{}", error);
        }
    }

    /// Render the authoritative state.
    pub fn render(&mut self) {
        let frame = Frame {
            angles: self.controller.display_angles(),
            lengths: self.lengths,
            trajectory: self.controller.trajectory(),
            target: self.controller.target(),
            frame: self.controller.display_frame(),
            dimmed: self.controller.is_scrubbing(),
        };

        self.view = self.renderer.render(&frame);

        log::trace!("{} {}", self.controller.state(), self.view.readout);

        if let Some(path) = &self.frame_path {
            self.view.scene.paint(&mut self.surface);

            if let Err(e) = std::fs::write(path, self.surface.document()) {
                log::warn!("Failed to write frame {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use armviz_core::Trajectory;

    use crate::{
        planner::{Plan, PlanError},
        playback::PlaybackState,
    };

    use super::*;

    struct FixedPlanner(usize);

    #[async_trait::async_trait]
    impl Planner for FixedPlanner {
        async fn plan(&self, request: &PlanRequest) -> Result<Plan, PlanError> {
            let start = JointAngles::from(request.current_angles);
            let samples = (0..self.0).map(|i| {
                let step = i as f32 * 0.01;
                (
                    i as f32 * request.dt,
                    JointAngles::new(start.q1() + step, start.q2(), start.q3()),
                )
            });

            Ok(Plan {
                goal: None,
                trajectory: Trajectory::from_joint_samples(samples, &request.lengths())?,
            })
        }
    }

    struct RejectingPlanner;

    #[async_trait::async_trait]
    impl Planner for RejectingPlanner {
        async fn plan(&self, _: &PlanRequest) -> Result<Plan, PlanError> {
            Err(PlanError::Rejected {
                status: 400,
                detail: "Target is out of reach or algorithm hit a singularity limit.".to_string(),
            })
        }
    }

    fn session(planner: Arc<dyn Planner>) -> (Session, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(crate::consts::QUEUE_SIZE_EVENT);

        let session = Session::new(&Config::default(), planner, tx, None).unwrap();

        (session, rx)
    }

    async fn plan(session: &mut Session, rx: &mut mpsc::Receiver<Event>, x: f32, y: f32) {
        assert!(session.handle(Event::Click { x, y }));
        assert!(session.controller().is_pending());

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::Planned { .. }));
        assert!(session.handle(event));
    }

    fn run_to_completion(session: &mut Session) {
        let epoch = session.controller().epoch();
        while session.controller().is_animating() {
            session.handle(Event::Tick { epoch });
        }
    }

    #[tokio::test]
    async fn test_click_animates() {
        let (mut session, mut rx) = session(Arc::new(FixedPlanner(50)));

        plan(&mut session, &mut rx, 400.0, 200.0).await;

        assert_eq!(
            session.controller().state(),
            PlaybackState::Animating { frame: 0 }
        );
        assert_eq!(session.controller().target(), Some(Point::new(100.0, 100.0)));
        assert_eq!(session.view().charts.marker().map(|m| m.frame), Some(0));

        run_to_completion(&mut session);

        let last = session.controller().trajectory().get(49).unwrap().angles();

        assert_eq!(session.controller().state(), PlaybackState::Idle);
        assert_eq!(session.controller().committed_angles(), last);
        assert_eq!(session.view().readout.angles, last);
        assert_eq!(session.view().charts.marker(), None);
    }

    #[tokio::test]
    async fn test_click_clamped() {
        let (mut session, mut rx) = session(Arc::new(FixedPlanner(3)));

        // 500 units right of the base, outside the 239.9 reach.
        plan(&mut session, &mut rx, 800.0, 300.0).await;

        let target = session.controller().target().unwrap();
        assert!((target.x - 239.9).abs() < 1e-3);
        assert!(target.y.abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_click_ignored_while_busy() {
        let (mut session, mut rx) = session(Arc::new(FixedPlanner(5)));

        assert!(session.handle(Event::Click { x: 400.0, y: 200.0 }));
        assert!(session.handle(Event::Click { x: 200.0, y: 400.0 }));
        assert_eq!(session.controller().target(), Some(Point::new(100.0, 100.0)));

        let event = rx.recv().await.unwrap();
        session.handle(event);

        assert!(session.controller().is_animating());

        session.handle(Event::Click { x: 200.0, y: 400.0 });

        assert_eq!(session.controller().target(), Some(Point::new(100.0, 100.0)));
        assert!(!session.controller().is_pending());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_planning_failure() {
        let (mut session, mut rx) = session(Arc::new(RejectingPlanner));

        plan(&mut session, &mut rx, 400.0, 200.0).await;

        assert_eq!(session.controller().state(), PlaybackState::Idle);
        assert_eq!(session.controller().target(), None);
        assert_eq!(
            session.controller().error(),
            Some("Target is out of reach or algorithm hit a singularity limit.")
        );
        assert_eq!(session.view().readout.angles, JointAngles::HOME);
    }

    #[tokio::test]
    async fn test_reset_discards_inflight_response() {
        let (mut session, mut rx) = session(Arc::new(FixedPlanner(5)));

        session.handle(Event::Click { x: 400.0, y: 200.0 });
        session.handle(Event::Reset);

        let event = rx.recv().await.unwrap();
        session.handle(event);

        assert_eq!(session.controller().state(), PlaybackState::Idle);
        assert!(session.controller().trajectory().is_empty());
        assert_eq!(session.view().readout.angles, JointAngles::HOME);
    }

    #[tokio::test]
    async fn test_scrub_and_resume() {
        let (mut session, mut rx) = session(Arc::new(FixedPlanner(20)));

        plan(&mut session, &mut rx, 400.0, 200.0).await;

        let epoch = session.controller().epoch();
        for _ in 0..5 {
            session.handle(Event::Tick { epoch });
        }

        session.handle(Event::HoverEnter(12));
        session.handle(Event::Tick { epoch });
        session.handle(Event::HoverMove(15));

        let scrubbed = session.controller().trajectory().get(15).unwrap().angles();
        assert_eq!(session.view().readout.angles, scrubbed);
        assert!(session.view().scene.is_dimmed());
        assert_eq!(session.view().charts.marker().map(|m| m.frame), Some(15));

        session.handle(Event::HoverLeave);

        let resumed = session.controller().trajectory().get(6).unwrap().angles();
        assert_eq!(session.view().readout.angles, resumed);
        assert!(!session.view().scene.is_dimmed());
    }

    #[tokio::test]
    async fn test_hover_at_chart_time() {
        let (mut session, mut rx) = session(Arc::new(FixedPlanner(20)));

        assert!(session.handle(Event::HoverAt(0.5)));
        assert_eq!(session.controller().state(), PlaybackState::Idle);

        plan(&mut session, &mut rx, 400.0, 200.0).await;

        session.handle(Event::HoverAt(0.51));

        let scrubbed = session.controller().trajectory().get(10).unwrap().angles();
        assert_eq!(
            session.controller().state(),
            PlaybackState::Scrubbing { frame: 10 }
        );
        assert_eq!(session.view().readout.angles, scrubbed);
        assert_eq!(session.view().charts.marker().map(|m| m.frame), Some(10));

        session.handle(Event::HoverAt(9.0));
        assert_eq!(session.view().charts.marker().map(|m| m.frame), Some(19));

        session.handle(Event::HoverLeave);
        assert_eq!(
            session.controller().state(),
            PlaybackState::Animating { frame: 0 }
        );
    }

    #[tokio::test]
    async fn test_lengths_locked_during_animation() {
        let (mut session, mut rx) = session(Arc::new(FixedPlanner(4)));

        plan(&mut session, &mut rx, 400.0, 200.0).await;

        session.handle(Event::SetLengths(LinkLengths::new(150.0, 150.0, 100.0)));
        session.handle(Event::SetDuration(5.0));

        assert_eq!(session.lengths(), LinkLengths::default());
        assert_eq!(session.duration(), 2.5);

        run_to_completion(&mut session);

        let effector_path: Vec<_> = session.controller().trajectory().effector_path().collect();

        session.handle(Event::SetLengths(LinkLengths::new(150.0, 150.0, 100.0)));
        session.handle(Event::SetDuration(50.0));

        assert_eq!(session.lengths(), LinkLengths::new(150.0, 150.0, 100.0));
        assert_eq!(session.duration(), 10.0);

        // Pose follows the new lengths, the stored path does not.
        let expected = armviz_core::algorithm::ForwardKinematics::new(session.lengths())
            .effector(&session.controller().committed_angles());
        assert_eq!(session.view().readout.effector, expected);

        let stored: Vec<_> = session.controller().trajectory().effector_path().collect();
        assert_eq!(stored, effector_path);
    }

    #[tokio::test]
    async fn test_output_files() {
        let dir = std::env::temp_dir().join(format!("armviz-session-{}", std::process::id()));

        let mut config = Config::default();
        config.output.directory = Some(dir.clone());
        config.output.trace = true;

        let (tx, mut rx) = mpsc::channel(crate::consts::QUEUE_SIZE_EVENT);
        let mut session = Session::new(&config, Arc::new(FixedPlanner(3)), tx, None).unwrap();

        session.render();
        assert!(dir.join(crate::consts::FRAME_FILE_NAME).exists());

        plan(&mut session, &mut rx, 400.0, 200.0).await;

        let frame = std::fs::read_to_string(dir.join(crate::consts::FRAME_FILE_NAME)).unwrap();
        assert!(frame.contains(crate::render::COLOR_TARGET));

        let trace = std::fs::read_to_string(dir.join(crate::consts::TRACE_FILE_NAME)).unwrap();
        assert_eq!(trace.lines().count(), 4);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_shutdown() {
        let (mut session, _rx) = session(Arc::new(FixedPlanner(3)));

        assert!(session.handle(Event::Status));
        assert!(!session.handle(Event::Shutdown));
    }
}

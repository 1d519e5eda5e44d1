//! Async driver for [`WorkspaceSession`]
//!
//! The coordinator runs each effect as its own task and funnels the results
//! back through a channel. Only the coordinator applies them, so the session
//! is never touched from more than one place.

use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::backend::{Backend, BackendGateway};
use crate::config::Config;
use crate::ui::action::Action;
use crate::ui::effect::Effect;
use crate::ui::error::SessionError;
use crate::ui::events::SessionEvent;
use crate::ui::session::WorkspaceSession;

pub struct Coordinator {
    session: WorkspaceSession,
    backend: Backend,
    /// Event channel sender
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Event channel receiver
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
    /// Effects whose result has not been applied yet
    in_flight: usize,
}

impl Coordinator {
    pub fn new(session: WorkspaceSession, backend: Backend) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            session,
            backend,
            event_tx,
            event_rx,
            in_flight: 0,
        }
    }

    pub fn from_config(config: &Config, gateway: Arc<dyn BackendGateway>) -> Self {
        Self::new(WorkspaceSession::new(config), Backend::new(gateway))
    }

    pub fn session(&self) -> &WorkspaceSession {
        &self.session
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Kick off the startup load without waiting for it
    pub fn bootstrap(&mut self) {
        let effects = self.session.bootstrap();
        self.spawn_all(effects);
    }

    /// Run an action; its backend calls proceed in the background
    pub fn dispatch(&mut self, action: Action) -> Result<(), SessionError> {
        let effects = self.session.handle_action(action)?;
        self.spawn_all(effects);
        Ok(())
    }

    fn spawn_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        self.in_flight += 1;
        let backend = self.backend.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = effect.run(&backend).await;
            if event_tx.send(event).is_err() {
                tracing::debug!("Coordinator dropped before backend result arrived");
            }
        });
    }

    fn apply(&mut self, event: SessionEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let follow_up = self.session.apply(event);
        self.spawn_all(follow_up);
    }

    async fn next_event(&mut self) -> Option<SessionEvent> {
        if self.in_flight == 0 {
            return None;
        }
        self.event_rx.recv().await
    }

    /// Wait for the next backend result and apply it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn step(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply every result that has already arrived, without waiting
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait until every effect, including follow-ups, has been applied
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Process actions from a channel until it closes and all work has settled
    pub async fn run(&mut self, mut actions: mpsc::UnboundedReceiver<Action>) {
        let mut actions_open = true;
        loop {
            tokio::select! {
                action = actions.recv(), if actions_open => match action {
                    Some(action) => {
                        if let Err(e) = self.dispatch(action) {
                            tracing::warn!(error = %e, "Action rejected");
                        }
                    }
                    None => actions_open = false,
                },
                Some(event) = self.event_rx.recv(), if self.in_flight > 0 => {
                    self.apply(event);
                }
                else => break,
            }
        }
    }

    // ========== Awaitable operations ==========

    pub async fn load_repositories(&mut self) {
        let effect = self.session.load_repositories();
        self.spawn(effect);
        self.settle().await;
    }

    pub async fn select_workspace(&mut self, workspace_id: Uuid) {
        let effect = self.session.select_workspace(workspace_id);
        self.spawn(effect);
        self.settle().await;
    }

    pub async fn open_file(&mut self, path: &str, name: &str) -> Result<(), SessionError> {
        let effect = self.session.open_file(path, name)?;
        self.spawn(effect);
        self.settle().await;
        Ok(())
    }

    pub async fn create_workspace(&mut self, repository_id: Uuid) {
        let effect = self.session.create_workspace(repository_id);
        self.spawn(effect);
        self.settle().await;
    }

    /// Clone a repository, failing if the backend rejects it.
    ///
    /// The failure is logged as well as returned.
    pub async fn clone_repository(&mut self, url: &str) -> Result<(), SessionError> {
        let effect = self.session.clone_repository(url)?;
        let expected = match &effect {
            Effect::CloneRepository { ticket, .. } => Some(*ticket),
            _ => None,
        };
        self.spawn(effect);

        let result = loop {
            let event = self.next_event().await.ok_or(SessionError::Closed)?;
            let finished = match &event {
                SessionEvent::RepositoryCloned { ticket, result, .. }
                    if Some(*ticket) == expected =>
                {
                    Some(result.clone())
                }
                _ => None,
            };
            self.apply(event);
            if let Some(result) = finished {
                break result;
            }
        };

        self.settle().await;
        result.map_err(SessionError::from)
    }

    pub async fn open_project(&mut self, path: &str) -> Result<(), SessionError> {
        let effect = self.session.open_project(path)?;
        self.spawn(effect);
        self.settle().await;
        Ok(())
    }

    pub async fn delete_repository(&mut self, id: Uuid) {
        let effect = self.session.delete_repository(id);
        self.spawn(effect);
        self.settle().await;
    }

    pub async fn delete_workspace(&mut self, id: Uuid) {
        let effect = self.session.delete_workspace(id);
        self.spawn(effect);
        self.settle().await;
    }
}

//! Model world.
//!
//! A deliberately naive rendition of the role protocol: a handful of fields
//! and one match. It is the oracle the real engine is compared against.

use lectern_core::Role;
use lectern_proto::{InitRemote, ServerMessage};

use super::operation::{ClientId, Operation, OperationError, OperationResult};

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Current presenter.
    pub presenter: Option<ClientId>,
    /// Current slide.
    pub current_slide: Option<u32>,
    /// Last reported deck length.
    pub total_slides: Option<u32>,
    /// Role per participant, `None` while disconnected.
    pub roles: Vec<Option<Role>>,
    /// Everything each participant has received.
    pub inboxes: Vec<Vec<ServerMessage>>,
}

#[derive(Debug, Clone, Default)]
struct ModelParticipant {
    connected: bool,
    role: Option<Role>,
    inbox: Vec<ServerMessage>,
}

/// Model world - the reference implementation.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    participants: Vec<ModelParticipant>,
    presenter: Option<ClientId>,
    current_slide: Option<u32>,
    total_slides: Option<u32>,
}

impl ModelWorld {
    /// Create a world with `num_clients` disconnected participants.
    pub fn new(num_clients: usize) -> Self {
        Self {
            participants: vec![ModelParticipant::default(); num_clients],
            presenter: None,
            current_slide: None,
            total_slides: None,
        }
    }

    /// Number of participants.
    pub fn num_clients(&self) -> usize {
        self.participants.len()
    }

    /// Apply an operation and return the result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        let id = op.client_id();
        let Some(participant) = self.participants.get(id as usize) else {
            return OperationResult::Error(OperationError::InvalidClient);
        };

        match op {
            Operation::Connect { .. } => {
                if participant.connected {
                    return OperationResult::Error(OperationError::AlreadyConnected);
                }
                let p = &mut self.participants[id as usize];
                p.connected = true;
                p.role = Some(Role::Unassigned);
                return OperationResult::Ok;
            },
            _ if !participant.connected => {
                return OperationResult::Error(OperationError::NotConnected);
            },
            _ => {},
        }

        match *op {
            Operation::Connect { .. } => {},
            Operation::Disconnect { .. } => {
                let p = &mut self.participants[id as usize];
                p.connected = false;
                p.role = None;
                if self.presenter == Some(id) {
                    self.presenter = None;
                    self.current_slide = None;
                    self.total_slides = None;
                    self.broadcast(Some(id), ServerMessage::mode_presenter(false));
                }
            },
            Operation::RegisterViewer { total_slides, .. } => {
                self.participants[id as usize].role = Some(Role::Viewer);
                match self.presenter {
                    None => {
                        self.total_slides = Some(u32::from(total_slides));
                        self.send(id, ServerMessage::mode_presenter(false));
                    },
                    Some(presenter) => {
                        if presenter == id {
                            self.total_slides = Some(u32::from(total_slides));
                        }
                        self.send(id, ServerMessage::mode_view(self.current_slide));
                    },
                }
            },
            Operation::RegisterRemote { .. } => {
                let p = &mut self.participants[id as usize];
                if p.role == Some(Role::Unassigned) {
                    p.role = Some(Role::Remote);
                }
                let snapshot = InitRemote {
                    slide: self.current_slide.unwrap_or(0),
                    total_slides: self.total_slides.unwrap_or(0),
                };
                self.send(id, ServerMessage::InitRemote(snapshot));
            },
            Operation::FollowPresenter { .. } => {
                if self.participants[id as usize].role == Some(Role::Viewer) {
                    self.send(id, ServerMessage::mode_view(self.current_slide));
                }
            },
            Operation::ReleasePresenter { .. } => {
                if self.presenter == Some(id) {
                    self.presenter = None;
                    self.broadcast(None, ServerMessage::mode_presenter(false));
                }
            },
            Operation::ClaimPresenter { correct_pass, slide, .. } => {
                if correct_pass && self.presenter != Some(id) {
                    let slide = u32::from(slide);
                    self.current_slide = Some(slide);
                    match self.presenter {
                        Some(previous) => self.send(previous, ServerMessage::mode_view(Some(slide))),
                        None => self.broadcast(Some(id), ServerMessage::mode_view(Some(slide))),
                    }
                    self.presenter = Some(id);
                    self.send(id, ServerMessage::mode_presenter(true));
                }
            },
            Operation::Goto { slide, .. } => {
                if self.presenter == Some(id) {
                    let slide = u32::from(slide);
                    self.current_slide = Some(slide);
                    self.broadcast(Some(id), ServerMessage::goto(slide));
                }
            },
        }

        OperationResult::Ok
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            presenter: self.presenter,
            current_slide: self.current_slide,
            total_slides: self.total_slides,
            roles: (0..self.participants.len())
                .map(|i| self.role_of(i as ClientId))
                .collect(),
            inboxes: self.participants.iter().map(|p| p.inbox.clone()).collect(),
        }
    }

    fn role_of(&self, id: ClientId) -> Option<Role> {
        let role = self.participants.get(id as usize)?.role?;
        if self.presenter == Some(id) { Some(Role::Presenter) } else { Some(role) }
    }

    fn send(&mut self, to: ClientId, message: ServerMessage) {
        if let Some(p) = self.participants.get_mut(to as usize)
            && p.connected
        {
            p.inbox.push(message);
        }
    }

    fn broadcast(&mut self, except: Option<ClientId>, message: ServerMessage) {
        for (i, p) in self.participants.iter_mut().enumerate() {
            if p.connected && except != Some(i as ClientId) {
                p.inbox.push(message);
            }
        }
    }
}

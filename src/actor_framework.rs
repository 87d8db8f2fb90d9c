use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::storage::{MemoryStore, StorageError, Store};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Failures of the actor plumbing itself, independent of any domain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Actor request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}

/// Trait that any domain entity must implement to be managed by [`ResourceActor`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in tracing spans.
    const NAME: &'static str;

    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;
    type CreateParams: Send + Debug + 'static;
    type UpdateParams: Send + Debug + 'static;
    type Action: Send + Debug + 'static;
    type ActionResult: Send + Debug + 'static;
    type Error: std::error::Error + From<FrameworkError> + From<StorageError> + Send + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the allocated ID and the creation params.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, update: Self::UpdateParams) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a domain-specific action on a working copy of the entity.
    ///
    /// The copy is committed to the store only when this returns `Ok`.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;

    /// Whether an action that produced `result` changed the entity. When it did not,
    /// the store is not written.
    fn action_mutated(_result: &Self::ActionResult) -> bool {
        true
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, E>>;

pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send>;

const PENDING: u8 = 0;
const CLAIMED: u8 = 1;
const ABANDONED: u8 = 2;

/// Shared between a caller and the actor. Whichever side moves it out of pending
/// first decides the request's fate: claimed requests run, abandoned ones never do.
#[derive(Debug, Clone, Default)]
pub struct Ticket(Arc<AtomicU8>);

impl Ticket {
    /// Actor side: `true` if the request may run.
    pub fn claim(&self) -> bool {
        self.0
            .compare_exchange(PENDING, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Caller side: `true` if the request is guaranteed never to run.
    pub fn abandon(&self) -> bool {
        self.0
            .compare_exchange(PENDING, ABANDONED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// What travels through an actor's mailbox.
pub struct Envelope<T: Entity> {
    pub ticket: Ticket,
    pub request: ResourceRequest<T>,
}

impl<T: Entity> Envelope<T> {
    pub fn new(request: ResourceRequest<T>) -> Self {
        Self {
            ticket: Ticket::default(),
            request,
        }
    }
}

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    Update {
        id: T::Id,
        update: T::UpdateParams,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Single owner of a store. Requests are handled one at a time, so two mutations of
/// the same entity can never interleave.
pub struct ResourceActor<T: Entity, S: Store<T> = MemoryStore<T>> {
    receiver: mpsc::Receiver<Envelope<T>>,
    store: S,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity, S: Store<T>> ResourceActor<T, S> {
    pub fn new(
        buffer_size: usize,
        store: S,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store,
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = T::NAME))]
    pub async fn run(mut self) {
        info!("Actor starting");

        while let Some(Envelope { ticket, request }) = self.receiver.recv().await {
            if !ticket.claim() {
                debug!("Skipping request abandoned by its caller");
                continue;
            }
            match request {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(self.store.get(&id).map_err(T::Error::from));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_update(id, update));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let result = self
                        .store
                        .list()
                        .map(|items| items.into_iter().filter(|item| filter(item)).collect())
                        .map_err(T::Error::from);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Shutdown => {
                    info!("Actor shutting down");
                    break;
                }
            }
        }

        info!("Actor stopped");
    }

    #[instrument(skip(self, params))]
    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, T::Error> {
        let id = (self.next_id_fn)();
        debug!(id = %id, "Processing create request");

        let mut item = T::from_create_params(id, params)?;
        item.on_create()?;
        self.store.put(&item).inspect_err(|e| {
            warn!(error = %e, "Create rolled back");
        })?;

        info!(id = %item.id(), "Created");
        Ok(item)
    }

    #[instrument(fields(id = %id), skip(self, update))]
    fn handle_update(&mut self, id: T::Id, update: T::UpdateParams) -> Result<T, T::Error> {
        debug!("Processing update request");
        let mut item = self.load(&id)?;
        item.on_update(update)?;
        self.store.put(&item)?;
        Ok(item)
    }

    #[instrument(fields(id = %id), skip(self))]
    fn handle_delete(&mut self, id: T::Id) -> Result<(), T::Error> {
        debug!("Processing delete request");
        let item = self.load(&id)?;
        item.on_delete()?;
        self.store.remove(&id)?;
        Ok(())
    }

    #[instrument(fields(id = %id), skip(self))]
    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        debug!("Processing action request");
        let mut item = self.load(&id)?;
        let result = item.handle_action(action)?;
        if T::action_mutated(&result) {
            self.store.put(&item).inspect_err(|e| {
                warn!(error = %e, "Action rolled back");
            })?;
        }
        Ok(result)
    }

    fn load(&self, id: &T::Id) -> Result<T, T::Error> {
        match self.store.get(id)? {
            Some(item) => Ok(item),
            None => Err(FrameworkError::NotFound(id.to_string()).into()),
        }
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<Envelope<T>>,
    timeout: Option<Duration>,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<Envelope<T>>) -> Self {
        Self {
            sender,
            timeout: None,
        }
    }

    /// Bound every request (enqueue plus reply) by `limit`.
    ///
    /// A request that times out has not been applied and never will be.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, T::Error> {
        self.dispatch(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, T::Error> {
        self.dispatch(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::UpdateParams) -> Result<T, T::Error> {
        self.dispatch(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), T::Error> {
        self.dispatch(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, T::Error> {
        self.dispatch(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    pub async fn list(
        &self,
        filter: impl Fn(&T) -> bool + Send + 'static,
    ) -> Result<Vec<T>, T::Error> {
        let filter: Filter<T> = Box::new(filter);
        self.dispatch(|respond_to| ResourceRequest::List { filter, respond_to })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        self.sender
            .send(Envelope::new(ResourceRequest::Shutdown))
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    async fn dispatch<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, T::Error> {
        let (respond_to, mut response) = oneshot::channel();
        let envelope = Envelope::new(build(respond_to));
        let ticket = envelope.ticket.clone();

        let Some(limit) = self.timeout else {
            self.sender
                .send(envelope)
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            return response.await.map_err(|_| FrameworkError::ActorDropped)?;
        };

        let deadline = tokio::time::Instant::now() + limit;
        // A send cut short by the deadline never reaches the mailbox.
        match tokio::time::timeout_at(deadline, self.sender.send(envelope)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => return Err(FrameworkError::ActorClosed.into()),
            Err(_) => return Err(FrameworkError::Timeout(limit).into()),
        }

        match tokio::time::timeout_at(deadline, &mut response).await {
            Ok(reply) => reply.map_err(|_| FrameworkError::ActorDropped)?,
            Err(_) if ticket.abandon() => {
                debug!(?limit, "Request abandoned before the actor reached it");
                Err(FrameworkError::Timeout(limit).into())
            }
            // Already claimed by the actor: its reply is the truth.
            Err(_) => response.await.map_err(|_| FrameworkError::ActorDropped)?,
        }
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

//! Where requests leave the front-end.
//!
//! No backend exists yet. [`Detached`] stands in for one and refuses every
//! request; a real client implements [`Dispatcher`] and is handed to a
//! [`Courier`] instead.

use crate::query::Request;
use crate::schema::Value;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Rows(Vec<Vec<Value>>),
    Tables(Vec<String>),
    Success,
}

/// Failure reported by a backend. Its shape belongs to the backend.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DispatchError(Box<dyn std::error::Error + Send + Sync>);

impl DispatchError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }

    pub fn unavailable() -> Self {
        Self::new("no backend connected")
    }
}

pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Reply, DispatchError>> + Send;
}

/// Logs every request and answers that nothing is connected.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl Dispatcher for Detached {
    async fn dispatch(&self, request: Request) -> Result<Reply, DispatchError> {
        match serde_json::to_string(&request) {
            Ok(payload) => debug!(%payload, "request payload"),
            Err(err) => warn!(%err, "request could not be serialized"),
        }
        info!(
            kind = request.kind(),
            table = request.table_name().unwrap_or("-"),
            "dropping request, no backend"
        );
        Err(DispatchError::unavailable())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

/// A finished dispatch.
#[derive(Debug)]
pub struct Delivery {
    pub ticket: Ticket,
    pub kind: &'static str,
    pub result: Result<Reply, DispatchError>,
}

/// Runs dispatches on a background runtime and hands results back to the
/// thread that polls it.
pub struct Courier<D> {
    dispatcher: Arc<D>,
    runtime: Runtime,
    sender: UnboundedSender<Delivery>,
    receiver: UnboundedReceiver<Delivery>,
    next_ticket: u64,
    in_flight: usize,
}

impl<D: Dispatcher> Courier<D> {
    pub fn new(dispatcher: D) -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("chipmunk-courier")
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        Ok(Self {
            dispatcher: Arc::new(dispatcher),
            runtime,
            sender,
            receiver,
            next_ticket: 0,
            in_flight: 0,
        })
    }

    pub fn send(&mut self, request: Request) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight += 1;

        let kind = request.kind();
        debug!(ticket = ticket.0, kind, "dispatching");
        let dispatcher = Arc::clone(&self.dispatcher);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result = supervise(dispatcher, request).await;
            // The receiver lives as long as the courier.
            let _ = sender.send(Delivery {
                ticket,
                kind,
                result,
            });
        });
        ticket
    }

    /// Next finished dispatch, if any. Never blocks.
    pub fn poll(&mut self) -> Option<Delivery> {
        let delivery = self.receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(delivery)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Dispatches on the courier's runtime and waits for the answer.
    pub fn dispatch_blocking(&self, request: Request) -> Result<Reply, DispatchError> {
        let kind = request.kind();
        debug!(kind, "dispatching and waiting");
        self.runtime.block_on(supervise(Arc::clone(&self.dispatcher), request))
    }
}

/// Runs one dispatch as its own task so a panicking dispatcher still yields
/// an answer.
async fn supervise<D: Dispatcher>(
    dispatcher: Arc<D>,
    request: Request,
) -> Result<Reply, DispatchError> {
    let kind = request.kind();
    match tokio::spawn(async move { dispatcher.dispatch(request).await }).await {
        Ok(result) => result,
        Err(err) => {
            warn!(kind, %err, "dispatch task failed");
            Err(DispatchError::new(format!("{kind} failed: {err}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, Table};
    use std::time::{Duration, Instant};

    struct Echo;

    impl Dispatcher for Echo {
        async fn dispatch(&self, request: Request) -> Result<Reply, DispatchError> {
            match request {
                Request::ListTables => Ok(Reply::Tables(vec!["users".into()])),
                Request::Clear { .. } => Err(DispatchError::new("table is locked")),
                _ => Ok(Reply::Success),
            }
        }
    }

    struct Faulty;

    impl Dispatcher for Faulty {
        async fn dispatch(&self, request: Request) -> Result<Reply, DispatchError> {
            match request {
                Request::ListTables => Ok(Reply::Tables(Vec::new())),
                _ => panic!("backend fault"),
            }
        }
    }

    fn users() -> Table {
        Table::new("users", vec![Field::new("id", FieldType::U64).unwrap()]).unwrap()
    }

    fn wait<D: Dispatcher>(courier: &mut Courier<D>) -> Delivery {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(delivery) = courier.poll() {
                return delivery;
            }
            assert!(Instant::now() < deadline, "no delivery in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_courier_delivers() {
        let mut courier = Courier::new(Echo).unwrap();
        let ticket = courier.send(Request::ListTables);
        assert_eq!(courier.in_flight(), 1);

        let delivery = wait(&mut courier);
        assert_eq!(delivery.ticket, ticket);
        assert_eq!(delivery.kind, "list tables");
        assert_eq!(delivery.result.unwrap(), Reply::Tables(vec!["users".into()]));
        assert_eq!(courier.in_flight(), 0);
        assert!(courier.poll().is_none());
    }

    #[test]
    fn test_courier_passes_errors_through() {
        let mut courier = Courier::new(Echo).unwrap();
        courier.send(Request::clear(&users()));
        let delivery = wait(&mut courier);
        assert_eq!(delivery.result.unwrap_err().to_string(), "table is locked");
    }

    #[test]
    fn test_detached_refuses() {
        let courier = Courier::new(Detached).unwrap();
        let err = courier
            .dispatch_blocking(Request::backup(&users()))
            .unwrap_err();
        assert_eq!(err.to_string(), "no backend connected");
    }

    #[test]
    fn test_tickets_increase() {
        let mut courier = Courier::new(Echo).unwrap();
        let first = courier.send(Request::ListTables);
        let second = courier.send(Request::export(&users()));
        assert!(first < second);
    }

    #[test]
    fn test_panicking_dispatch_is_delivered_as_error() {
        let mut courier = Courier::new(Faulty).unwrap();
        let ticket = courier.send(Request::backup(&users()));
        let delivery = wait(&mut courier);
        assert_eq!(delivery.ticket, ticket);
        let message = delivery.result.unwrap_err().to_string();
        assert!(message.starts_with("backup table failed"), "{message}");
        assert_eq!(courier.in_flight(), 0);

        assert!(courier.dispatch_blocking(Request::export(&users())).is_err());
        assert_eq!(
            courier.dispatch_blocking(Request::ListTables).unwrap(),
            Reply::Tables(Vec::new())
        );
    }
}

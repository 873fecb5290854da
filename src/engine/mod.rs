//! Interface to the external calculation engine.
//!
//! The engine is a black box: we submit [`Transaction`]s of edit payloads and,
//! at some later point, receive [`PatchBatch`]es describing what to display.
//! There is no ordering guarantee between the two streams.

mod patch;
mod payload;

pub use patch::{apply_batch, DisplayPatch, PatchBatch, StyleEntry, ValueEntry};
pub use payload::{CellInputValue, EditPayload, Transaction};

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;

/// Patch batches received from the engine, waiting for the next frame.
pub type PatchInbox = Rc<RefCell<Vec<PatchBatch>>>;

/// Sink for outbound transactions.
pub trait EngineClient {
    /// Hand a transaction to the engine. Replies arrive asynchronously.
    ///
    /// # Errors
    /// Returns an error if the transaction could not be handed off.
    fn submit(&mut self, tx: Transaction) -> Result<()>;
}

/// Client that only records what was submitted.
///
/// Clones share the same queue, so a test can keep a handle after moving
/// the client into a session.
#[derive(Debug, Clone, Default)]
pub struct QueueClient {
    sent: Rc<RefCell<Vec<Transaction>>>,
}

impl QueueClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every recorded transaction.
    pub fn take(&self) -> Vec<Transaction> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.borrow().is_empty()
    }
}

impl EngineClient for QueueClient {
    fn submit(&mut self, tx: Transaction) -> Result<()> {
        log::debug!("queued transaction with {} payloads", tx.payloads.len());
        self.sent.borrow_mut().push(tx);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use js_client::JsEngineClient;

#[cfg(target_arch = "wasm32")]
mod js_client {
    use std::rc::Rc;

    use js_sys::{Function, Promise};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use super::{EngineClient, PatchBatch, PatchInbox, Transaction};
    use crate::error::{Result, SheetViewError};

    /// Client backed by a JS function `(transaction) => Promise<PatchBatch | undefined>`.
    ///
    /// Resolved batches land in the shared inbox and are applied between frames.
    pub struct JsEngineClient {
        send: Function,
        inbox: PatchInbox,
        waker: Option<Rc<dyn Fn()>>,
    }

    impl JsEngineClient {
        pub fn new(send: Function, inbox: PatchInbox) -> Self {
            Self {
                send,
                inbox,
                waker: None,
            }
        }

        /// Call `waker` after a reply lands in the inbox, e.g. to schedule a frame.
        #[must_use]
        pub fn with_waker(mut self, waker: Rc<dyn Fn()>) -> Self {
            self.waker = Some(waker);
            self
        }
    }

    impl EngineClient for JsEngineClient {
        fn submit(&mut self, tx: Transaction) -> Result<()> {
            let value = serde_wasm_bindgen::to_value(&tx)
                .map_err(|e| SheetViewError::Patch(e.to_string()))?;
            let ret = self
                .send
                .call1(&JsValue::NULL, &value)
                .map_err(|e| SheetViewError::Other(format!("engine call failed: {e:?}")))?;
            let Ok(promise) = ret.dyn_into::<Promise>() else {
                return Ok(());
            };
            let inbox = Rc::clone(&self.inbox);
            let waker = self.waker.as_ref().map(Rc::clone);
            wasm_bindgen_futures::spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(reply) if reply.is_undefined() || reply.is_null() => {}
                    Ok(reply) => match serde_wasm_bindgen::from_value::<PatchBatch>(reply) {
                        Ok(batch) => {
                            inbox.borrow_mut().push(batch);
                            if let Some(wake) = waker {
                                wake();
                            }
                        }
                        Err(e) => log::warn!("malformed patch batch from engine: {e}"),
                    },
                    Err(e) => log::warn!("engine rejected transaction: {e:?}"),
                }
            });
            Ok(())
        }
    }
}

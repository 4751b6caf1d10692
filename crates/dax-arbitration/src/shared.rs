//! Thread-safe engine handle with a re-entrancy guard.
//!
//! Fee collection calls out to a ledger while the engine is mid-operation.
//! A ledger that calls back into the same engine from inside that callout
//! gets [`ArbitrationError::Reentrant`] instead of a deadlock. Calls from
//! other threads wait for the current operation to finish.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, MutexGuard};

use crate::engine::ArbitrationEngine;
use crate::error::ArbitrationError;

/// Cloneable handle to one engine.
#[derive(Clone)]
pub struct SharedEngine {
    engine: Arc<Mutex<ArbitrationEngine>>,
    holder: Arc<Mutex<Option<ThreadId>>>,
}

/// Clears the holder when an operation ends, including by panic.
struct HolderGuard<'a> {
    holder: &'a Mutex<Option<ThreadId>>,
}

impl Drop for HolderGuard<'_> {
    fn drop(&mut self) {
        *self.holder.lock() = None;
    }
}

impl SharedEngine {
    pub fn new(engine: ArbitrationEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            holder: Arc::new(Mutex::new(None)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    ///
    /// # Errors
    ///
    /// [`ArbitrationError::Reentrant`] if this thread is already inside
    /// `with_engine` or [`inspect`](Self::inspect) on the same engine;
    /// otherwise whatever `f` returns.
    pub fn with_engine<R>(
        &self,
        f: impl FnOnce(&mut ArbitrationEngine) -> Result<R, ArbitrationError>,
    ) -> Result<R, ArbitrationError> {
        let mut engine = self.enter()?;
        let _holder = self.hold();
        f(&mut engine)
    }

    /// Run a read-only query. Nested calls are refused as in
    /// [`with_engine`](Self::with_engine).
    pub fn inspect<R>(&self, f: impl FnOnce(&ArbitrationEngine) -> R) -> Result<R, ArbitrationError> {
        let engine = self.enter()?;
        let _holder = self.hold();
        Ok(f(&engine))
    }

    /// Clone the current engine state.
    pub fn snapshot(&self) -> Result<ArbitrationEngine, ArbitrationError> {
        self.inspect(Clone::clone)
    }

    fn enter(&self) -> Result<MutexGuard<'_, ArbitrationEngine>, ArbitrationError> {
        if *self.holder.lock() == Some(thread::current().id()) {
            tracing::warn!("re-entrant engine call refused");
            return Err(ArbitrationError::Reentrant);
        }
        Ok(self.engine.lock())
    }

    /// Mark this thread as the holder. The returned guard must be dropped
    /// before the engine lock is released.
    fn hold(&self) -> HolderGuard<'_> {
        *self.holder.lock() = Some(thread::current().id());
        HolderGuard {
            holder: &self.holder,
        }
    }
}

impl std::fmt::Debug for SharedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine")
            .field("held_by", &*self.holder.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::fees::FeeSchedule;
    use dax_core::{
        ActorId, Amount, AssetId, DisclosureStatus, InMemoryLedger, LedgerError,
        NegotiationStatus, ValueLedger,
    };

    fn actor(n: u64) -> ActorId {
        ActorId::derive(b"shared-test", n)
    }

    fn asset() -> AssetId {
        AssetId::new("USDC").unwrap()
    }

    fn shared() -> SharedEngine {
        SharedEngine::new(
            ArbitrationEngine::new(EngineConfig {
                address: actor(3),
                owner: actor(0),
                treasury: actor(2),
                fee_asset: asset(),
                fees: FeeSchedule::default(),
            })
            .unwrap(),
        )
    }

    struct Signed(ActorId);

    impl DisclosureStatus for Signed {
        fn disclosure_id(&self) -> ActorId {
            self.0
        }
        fn status(&self) -> NegotiationStatus {
            NegotiationStatus::Signed
        }
        fn requested_reward(&self) -> Amount {
            Amount::new(1000)
        }
    }

    /// A ledger that tries to call back into the engine during a transfer.
    struct CallbackLedger {
        inner: InMemoryLedger,
        handle: SharedEngine,
        callback_result: Option<Result<(), ArbitrationError>>,
    }

    impl ValueLedger for CallbackLedger {
        fn asset(&self) -> &AssetId {
            self.inner.asset()
        }

        fn balance_of(&self, actor: &ActorId) -> Amount {
            self.inner.balance_of(actor)
        }

        fn transfer_from(
            &mut self,
            spender: &ActorId,
            from: &ActorId,
            to: &ActorId,
            amount: Amount,
        ) -> Result<(), LedgerError> {
            let result = self
                .handle
                .with_engine(|e| e.set_base_submission_fee(&actor(0), Amount::ZERO));
            self.callback_result = Some(result);
            self.inner.transfer_from(spender, from, to, amount)
        }

        fn transfer(
            &mut self,
            from: &ActorId,
            to: &ActorId,
            amount: Amount,
        ) -> Result<(), LedgerError> {
            self.inner.transfer(from, to, amount)
        }
    }

    #[test]
    fn callback_into_engine_is_refused() {
        let handle = shared();
        let mut inner = InMemoryLedger::new(asset());
        inner.mint(&actor(1), Amount::new(1000)).unwrap();
        inner.approve(&actor(1), &actor(3), Amount::new(1000));
        let mut ledger = CallbackLedger {
            inner,
            handle: handle.clone(),
            callback_result: None,
        };

        handle
            .with_engine(|e| e.make_eligible(&actor(1), &Signed(actor(50)), &mut ledger))
            .unwrap();

        assert!(matches!(
            ledger.callback_result,
            Some(Err(ArbitrationError::Reentrant))
        ));
        let engine = handle.snapshot().unwrap();
        assert_eq!(engine.queue_info().base_submission_fee, Amount::new(100));
    }

    #[test]
    fn nested_inspect_is_refused() {
        let handle = shared();
        let inner = handle.with_engine(|_| Ok(handle.inspect(|e| e.owner())));
        assert!(matches!(inner, Ok(Err(ArbitrationError::Reentrant))));
    }

    #[test]
    fn mutation_inside_inspect_is_refused() {
        let handle = shared();
        let worker = handle.clone();
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let inner = worker.inspect(|_| worker.with_engine(|e| e.enable_multi_arbiter(&actor(0))));
            let _ = tx.send(inner);
        });
        let inner = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("nested call must return instead of blocking");
        assert!(matches!(inner, Ok(Err(ArbitrationError::Reentrant))));
        assert!(!handle.inspect(|e| e.multi_arbiter_enabled()).unwrap());
    }

    #[test]
    fn inspect_inside_inspect_is_refused_and_holder_cleared() {
        let handle = shared();
        let inner = handle.inspect(|_| handle.inspect(|e| e.owner()));
        assert!(matches!(inner, Ok(Err(ArbitrationError::Reentrant))));
        assert_eq!(handle.inspect(|e| e.owner()).unwrap(), actor(0));
    }

    #[test]
    fn handle_usable_after_operation_fails() {
        let handle = shared();
        let err = handle
            .with_engine(|e| e.enable_multi_arbiter(&actor(9)))
            .unwrap_err();
        assert!(matches!(err, ArbitrationError::Unauthorized { .. }));
        handle.with_engine(|e| e.enable_multi_arbiter(&actor(0))).unwrap();
        assert!(handle.inspect(|e| e.multi_arbiter_enabled()).unwrap());
    }

    #[test]
    fn other_threads_wait_their_turn() {
        let handle = shared();
        let workers: Vec<_> = (0..4u64)
            .map(|n| {
                let h = handle.clone();
                std::thread::spawn(move || h.with_engine(|e| e.add_arbiter(&actor(0), actor(100 + n))))
            })
            .collect();
        for w in workers {
            assert!(w.join().unwrap().unwrap());
        }
        assert_eq!(handle.inspect(|e| e.arbiters().len()).unwrap(), 4);
    }
}

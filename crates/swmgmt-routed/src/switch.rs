//! The switch object.
//!
//! One [`Switch`] owns the hardware adapter and the route cache behind a
//! single async mutex. Every request takes the guard once and holds it from
//! the cache lookup through the hardware calls to the cache update, so two
//! requests for the same network can never both decide to install it.

use crate::route::{
    AddOutcome, RouteError, RouteManager, RouteManagerConfig, WithdrawOutcome,
};
use swmgmt_asic::L3Api;
use tokio::sync::{Mutex, MutexGuard};

/// State guarded by the switch lock.
#[derive(Debug)]
pub struct SwitchState<A> {
    pub asic: A,
    pub routes: RouteManager,
}

impl<A: L3Api> SwitchState<A> {
    pub fn add_route4(&mut self, network: &str, nexthop: &str) -> Result<AddOutcome, RouteError> {
        self.routes.add_route4(&mut self.asic, network, nexthop)
    }

    pub fn withdraw_route4(&mut self, network: &str) -> Result<WithdrawOutcome, RouteError> {
        self.routes.withdraw_route4(&mut self.asic, network)
    }
}

/// A switch with its L3 tables under one lock.
#[derive(Debug)]
pub struct Switch<A> {
    state: Mutex<SwitchState<A>>,
}

impl<A: L3Api> Switch<A> {
    /// Brings up routing on `asic`: CPU egress and default route.
    pub fn new(mut asic: A, config: &RouteManagerConfig) -> Result<Self, RouteError> {
        let routes = RouteManager::start(&mut asic, config)?;
        Ok(Self {
            state: Mutex::new(SwitchState { asic, routes }),
        })
    }

    /// Takes the switch-wide lock.
    pub async fn lock(&self) -> MutexGuard<'_, SwitchState<A>> {
        self.state.lock().await
    }

    pub async fn add_route4(&self, network: &str, nexthop: &str) -> Result<AddOutcome, RouteError> {
        self.lock().await.add_route4(network, nexthop)
    }

    pub async fn withdraw_route4(&self, network: &str) -> Result<WithdrawOutcome, RouteError> {
        self.lock().await.withdraw_route4(network)
    }

    /// Consumes the switch, returning the adapter and route manager.
    pub fn into_inner(self) -> SwitchState<A> {
        self.state.into_inner()
    }
}

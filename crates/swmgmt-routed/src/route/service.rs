//! gRPC adapter for the route engine.
//!
//! Translates `routemgmt.RouteMgmt` requests into engine calls and engine
//! results back into `RouteMgmtResult`. Failures travel in-band as
//! `FAILED` with an error string; the RPC itself always succeeds.

use super::engine::{AddOutcome, RouteError, WithdrawOutcome};
use super::proto::route_mgmt_server::RouteMgmt;
use super::proto::{AddRoute4Request, RouteMgmtResult, WithdrawRoute4Request};
use crate::switch::Switch;
use std::sync::Arc;
use swmgmt_asic::L3Api;
use tonic::{Request, Response, Status};
use tracing::{debug, warn};

/// Implements `routemgmt.RouteMgmt` on top of a [`Switch`].
#[derive(Debug)]
pub struct RouteMgmtService<A> {
    switch: Arc<Switch<A>>,
}

impl<A> RouteMgmtService<A> {
    pub fn new(switch: Arc<Switch<A>>) -> Self {
        Self { switch }
    }

    pub fn switch(&self) -> &Arc<Switch<A>> {
        &self.switch
    }
}

impl<A> Clone for RouteMgmtService<A> {
    fn clone(&self) -> Self {
        Self {
            switch: Arc::clone(&self.switch),
        }
    }
}

fn to_result<T>(outcome: Result<T, RouteError>) -> RouteMgmtResult {
    match outcome {
        Ok(_) => RouteMgmtResult::success(),
        Err(e) => RouteMgmtResult::failed(e.to_string()),
    }
}

#[tonic::async_trait]
impl<A: L3Api + 'static> RouteMgmt for RouteMgmtService<A> {
    async fn add_route4(
        &self,
        request: Request<AddRoute4Request>,
    ) -> Result<Response<RouteMgmtResult>, Status> {
        let req = request.into_inner();
        let network = req.network.map(|n| n.cidr4).unwrap_or_default();
        let nexthop = req.next_hop.map(|h| h.ip4).unwrap_or_default();

        let outcome = self.switch.add_route4(&network, &nexthop).await;
        match &outcome {
            Ok(AddOutcome::AlreadyPresent) => {
                debug!(network = %network, "AddRoute4: route already present")
            }
            Ok(AddOutcome::Installed) => {}
            Err(e) => warn!(network = %network, nexthop = %nexthop, error = %e, "AddRoute4 failed"),
        }

        Ok(Response::new(to_result(outcome)))
    }

    async fn withdraw_route4(
        &self,
        request: Request<WithdrawRoute4Request>,
    ) -> Result<Response<RouteMgmtResult>, Status> {
        let network = request
            .into_inner()
            .network
            .map(|n| n.cidr4)
            .unwrap_or_default();

        let outcome = self.switch.withdraw_route4(&network).await;
        match &outcome {
            Ok(WithdrawOutcome::NotPresent) => {
                debug!(network = %network, "WithdrawRoute4: route not present")
            }
            Ok(WithdrawOutcome::Pinned) => {
                debug!(network = %network, "WithdrawRoute4: default route left installed")
            }
            Ok(WithdrawOutcome::Withdrawn) => {}
            Err(e) => warn!(network = %network, error = %e, "WithdrawRoute4 failed"),
        }

        Ok(Response::new(to_result(outcome)))
    }
}

//! JavaScript bindings (`wasm` feature).
//!
//! Inputs and outputs are plain JS objects converted with
//! `serde-wasm-bindgen`; their shapes are [`AssignRequest`],
//! [`PlanRequest`], [`AssignResult`](crate::assign::AssignResult) and
//! [`PlanResponse`](crate::request::PlanResponse).

use crate::request::{AssignRequest, PlanRequest};
use wasm_bindgen::prelude::*;

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Assigns points to the given centroids under capacity limits.
#[wasm_bindgen(js_name = assignClusters)]
pub fn assign_clusters(input: JsValue) -> Result<JsValue, JsValue> {
    let req: AssignRequest = serde_wasm_bindgen::from_value(input).map_err(to_js_error)?;
    let result = req.run().map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
}

/// Discovers centroids with k-means, then assigns under capacity limits.
#[wasm_bindgen(js_name = planRoutes)]
pub fn plan_routes(input: JsValue) -> Result<JsValue, JsValue> {
    let req: PlanRequest = serde_wasm_bindgen::from_value(input).map_err(to_js_error)?;
    let response = req.run().map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&response).map_err(to_js_error)
}

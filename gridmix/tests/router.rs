mod helpers;

#[path = "router/admin/router_admin.rs"]
mod router_admin;

#[path = "router/bundle/router_bundle.rs"]
mod router_bundle;

#[path = "router/core/router_builder.rs"]
mod router_builder;

#[path = "router/mix/router_mix.rs"]
mod router_mix;

#[path = "router/series/router_series_cache.rs"]
mod router_series_cache;
#[path = "router/series/router_series_chunks.rs"]
mod router_series_chunks;
#[path = "router/series/router_series_reconcile_prop.rs"]
mod router_series_reconcile_prop;

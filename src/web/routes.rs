// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      // Catalog (read-only)
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      // Session cart (in-memory, per session token)
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_cart_item_handler))
          .route(
            "/items/{product_id}/decrement",
            web::post().to(cart_handlers::decrement_cart_item_handler),
          )
          .route(
            "/items/{product_id}",
            web::delete().to(cart_handlers::remove_cart_item_handler),
          )
          .route("/checkout", web::post().to(cart_handlers::checkout_handler)),
      )
      // Orders (owner-scoped)
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route("/{order_id}", web::put().to(order_handlers::update_order_handler))
          .route("/{order_id}/cancel", web::post().to(order_handlers::cancel_order_handler)),
      ),
  );
}

//! Shop service.
//!
//! @APIVersion 2.0.0
//! @APITitle Shop API
//! @APIDescription Orders and customers of the shop.
//! @Contact api@shop.example.com
//! @License MIT
//! @LicenseUrl https://opensource.org/licenses/MIT
//! @SubApi Order management [/orders]

mod models;
mod orders;
mod users;

/// Starts the HTTP server.
fn main() {
    println!("listening");
}

use crate::models::ViewId;
use crate::routes::{RouteAccess, RouteDef};

/// Admin Route Module
///
/// Lot management views. Each route, nested ones included, declares both
/// flags itself; a child without flags would be reachable by anyone.
pub fn admin_routes() -> Vec<RouteDef> {
    vec![
        // /admindashboard
        // Lot occupancy overview and revenue charts.
        RouteDef::new("/admindashboard", "AdminDashboard", ViewId::AdminDashboard)
            .with_access(RouteAccess::ADMIN)
            // /admindashboard/add-parking-lot
            .child(
                RouteDef::new("add-parking-lot", "AddParkinglots", ViewId::AddParkingLots)
                    .with_access(RouteAccess::ADMIN),
            ),
    ]
}

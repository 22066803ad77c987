//! Permissions declared by the protected routes.

use dutyroster_auth::Permission;

pub const DUTIES_VIEW: Permission = Permission::from_static("duties.view");
pub const DUTIES_EDIT: Permission = Permission::from_static("duties.edit");

pub const DUTY_TYPES_VIEW: Permission = Permission::from_static("dutyTypes.view");
pub const DUTY_TYPES_EDIT: Permission = Permission::from_static("dutyTypes.edit");

pub const DUTY_WORKERS_VIEW: Permission = Permission::from_static("dutyWorkers.view");
pub const DUTY_WORKERS_EDIT: Permission = Permission::from_static("dutyWorkers.edit");

/// Every declared permission, for the startup check.
pub const ALL: [Permission; 6] = [
    DUTIES_VIEW,
    DUTIES_EDIT,
    DUTY_TYPES_VIEW,
    DUTY_TYPES_EDIT,
    DUTY_WORKERS_VIEW,
    DUTY_WORKERS_EDIT,
];

/// A permission declared at the type level, checked by
/// [`crate::authz::RequirePermission`] before the request body is read.
pub trait RoutePermission: 'static {
    const PERMISSION: Permission;
}

macro_rules! route_permissions {
    ($($marker:ident => $permission:ident),* $(,)?) => {
        $(
            pub struct $marker;

            impl RoutePermission for $marker {
                const PERMISSION: Permission = $permission;
            }
        )*
    };
}

route_permissions! {
    DutiesView => DUTIES_VIEW,
    DutiesEdit => DUTIES_EDIT,
    DutyTypesView => DUTY_TYPES_VIEW,
    DutyTypesEdit => DUTY_TYPES_EDIT,
    DutyWorkersView => DUTY_WORKERS_VIEW,
    DutyWorkersEdit => DUTY_WORKERS_EDIT,
}

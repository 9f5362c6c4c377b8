//! Navigation menu registry.
//!
//! Menus hold groups of items; items link to a model list view and carry
//! add/import buttons. Each level is filtered by the requesting user's
//! permissions before display.

use crate::store::Permissions;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    Green,
    Cyan,
}

/// Buttons attached to a model item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Import,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MenuItemButton {
    pub link: String,
    pub title: String,
    pub icon_class: String,
    pub permissions: Vec<String>,
    pub color: Option<ButtonColor>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub link: String,
    pub link_text: String,
    pub permissions: Vec<String>,
    pub buttons: Vec<MenuItemButton>,
}

impl MenuItem {
    /// A plain link without buttons, guarded by one permission.
    pub fn link(link: &str, link_text: &str, permission: &str) -> MenuItem {
        MenuItem {
            link: link.to_string(),
            link_text: link_text.to_string(),
            permissions: vec![permission.to_string()],
            buttons: vec![],
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MenuGroup {
    pub label: String,
    pub items: Vec<MenuItem>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Menu {
    pub label: String,
    pub icon_class: String,
    pub groups: Vec<MenuGroup>,
}

/// List link for `app.model`, viewable with `app.view_model`.
///
/// ```
/// use prefix_table::menu::{model_item, Action};
///
/// let item = model_item("ipam", "prefix", "Prefixes", &[Action::Add]);
/// assert_eq!(item.link, "ipam:prefix_list");
/// assert_eq!(item.permissions, vec!["ipam.view_prefix"]);
/// assert_eq!(item.buttons[0].link, "ipam:prefix_add");
/// ```
pub fn model_item(app: &str, model: &str, label: &str, actions: &[Action]) -> MenuItem {
    MenuItem {
        link: format!("{app}:{model}_list"),
        link_text: label.to_string(),
        permissions: vec![format!("{app}.view_{model}")],
        buttons: model_buttons(app, model, actions),
    }
}

fn model_buttons(app: &str, model: &str, actions: &[Action]) -> Vec<MenuItemButton> {
    let mut buttons = Vec::new();
    if actions.contains(&Action::Add) {
        buttons.push(MenuItemButton {
            link: format!("{app}:{model}_add"),
            title: "Add".to_string(),
            icon_class: "mdi mdi-plus-thick".to_string(),
            permissions: vec![format!("{app}.add_{model}")],
            color: Some(ButtonColor::Green),
        });
    }
    if actions.contains(&Action::Import) {
        buttons.push(MenuItemButton {
            link: format!("{app}:{model}_import"),
            title: "Import".to_string(),
            icon_class: "mdi mdi-upload".to_string(),
            permissions: vec![format!("{app}.add_{model}")],
            color: Some(ButtonColor::Cyan),
        });
    }
    buttons
}

const ADD_IMPORT: &[Action] = &[Action::Add, Action::Import];
const IMPORT: &[Action] = &[Action::Import];

fn group(label: &str, items: Vec<MenuItem>) -> MenuGroup {
    MenuGroup {
        label: label.to_string(),
        items,
    }
}

fn menu(label: &str, icon_class: &str, groups: Vec<MenuGroup>) -> Menu {
    Menu {
        label: label.to_string(),
        icon_class: icon_class.to_string(),
        groups,
    }
}

fn organization_menu() -> Menu {
    menu(
        "Organization",
        "mdi mdi-domain",
        vec![
            group(
                "Sites",
                vec![
                    model_item("dcim", "site", "Sites", ADD_IMPORT),
                    model_item("dcim", "region", "Regions", ADD_IMPORT),
                    model_item("dcim", "sitegroup", "Site Groups", ADD_IMPORT),
                    model_item("dcim", "location", "Locations", ADD_IMPORT),
                ],
            ),
            group(
                "Racks",
                vec![
                    model_item("dcim", "rack", "Racks", ADD_IMPORT),
                    model_item("dcim", "rackrole", "Rack Roles", ADD_IMPORT),
                    model_item("dcim", "rackreservation", "Reservations", ADD_IMPORT),
                    MenuItem::link("dcim:rack_elevation_list", "Elevations", "dcim.view_rack"),
                ],
            ),
            group(
                "Tenancy",
                vec![
                    model_item("tenancy", "tenant", "Tenants", ADD_IMPORT),
                    model_item("tenancy", "tenantgroup", "Tenant Groups", ADD_IMPORT),
                ],
            ),
        ],
    )
}

fn devices_menu() -> Menu {
    let components = [
        ("interface", "Interfaces"),
        ("frontport", "Front Ports"),
        ("rearport", "Rear Ports"),
        ("consoleport", "Console Ports"),
        ("consoleserverport", "Console Server Ports"),
        ("powerport", "Power Ports"),
        ("poweroutlet", "Power Outlets"),
        ("devicebay", "Device Bays"),
        ("inventoryitem", "Inventory Items"),
    ];
    menu(
        "Devices",
        "mdi mdi-server",
        vec![
            group(
                "Devices",
                vec![
                    model_item("dcim", "device", "Devices", ADD_IMPORT),
                    model_item("dcim", "devicerole", "Device Roles", ADD_IMPORT),
                    model_item("dcim", "platform", "Platforms", ADD_IMPORT),
                    model_item("dcim", "virtualchassis", "Virtual Chassis", ADD_IMPORT),
                ],
            ),
            group(
                "Device Types",
                vec![
                    model_item("dcim", "devicetype", "Device Types", ADD_IMPORT),
                    model_item("dcim", "manufacturer", "Manufacturers", ADD_IMPORT),
                ],
            ),
            group(
                "Device Components",
                components
                    .iter()
                    .map(|(model, label)| model_item("dcim", model, label, IMPORT))
                    .collect(),
            ),
        ],
    )
}

fn connections_menu() -> Menu {
    menu(
        "Connections",
        "mdi mdi-ethernet",
        vec![group(
            "Connections",
            vec![
                model_item("dcim", "cable", "Cables", IMPORT),
                MenuItem::link(
                    "dcim:interface_connections_list",
                    "Interface Connections",
                    "dcim.view_interface",
                ),
                MenuItem::link(
                    "dcim:console_connections_list",
                    "Console Connections",
                    "dcim.view_consoleport",
                ),
                MenuItem::link(
                    "dcim:power_connections_list",
                    "Power Connections",
                    "dcim.view_powerport",
                ),
            ],
        )],
    )
}

fn ipam_menu() -> Menu {
    menu(
        "IPAM",
        "mdi mdi-counter",
        vec![
            group(
                "IP Addresses",
                vec![
                    model_item("ipam", "ipaddress", "IP Addresses", ADD_IMPORT),
                    model_item("ipam", "iprange", "IP Ranges", ADD_IMPORT),
                ],
            ),
            group(
                "Prefixes",
                vec![
                    model_item("ipam", "prefix", "Prefixes", ADD_IMPORT),
                    model_item("ipam", "role", "Prefix & VLAN Roles", ADD_IMPORT),
                ],
            ),
            group(
                "Aggregates",
                vec![
                    model_item("ipam", "aggregate", "Aggregates", ADD_IMPORT),
                    model_item("ipam", "rir", "RIRs", ADD_IMPORT),
                ],
            ),
            group(
                "VRFs",
                vec![
                    model_item("ipam", "vrf", "VRFs", ADD_IMPORT),
                    model_item("ipam", "routetarget", "Route Targets", ADD_IMPORT),
                ],
            ),
            group(
                "VLANs",
                vec![
                    model_item("ipam", "vlan", "VLANs", ADD_IMPORT),
                    model_item("ipam", "vlangroup", "VLAN Groups", ADD_IMPORT),
                ],
            ),
            group(
                "Services",
                vec![model_item("ipam", "service", "Services", IMPORT)],
            ),
        ],
    )
}

fn virtualization_menu() -> Menu {
    menu(
        "Virtualization",
        "mdi mdi-monitor",
        vec![
            group(
                "Virtual Machines",
                vec![
                    model_item("virtualization", "virtualmachine", "Virtual Machines", ADD_IMPORT),
                    model_item("virtualization", "vminterface", "Interfaces", IMPORT),
                ],
            ),
            group(
                "Clusters",
                vec![
                    model_item("virtualization", "cluster", "Clusters", ADD_IMPORT),
                    model_item("virtualization", "clustertype", "Cluster Types", ADD_IMPORT),
                    model_item("virtualization", "clustergroup", "Cluster Groups", ADD_IMPORT),
                ],
            ),
        ],
    )
}

fn circuits_menu() -> Menu {
    menu(
        "Circuits",
        "mdi mdi-transit-connection-variant",
        vec![
            group(
                "Circuits",
                vec![
                    model_item("circuits", "circuit", "Circuits", ADD_IMPORT),
                    model_item("circuits", "circuittype", "Circuit Types", ADD_IMPORT),
                ],
            ),
            group(
                "Providers",
                vec![
                    model_item("circuits", "provider", "Providers", ADD_IMPORT),
                    model_item("circuits", "providernetwork", "Provider Networks", ADD_IMPORT),
                ],
            ),
        ],
    )
}

fn power_menu() -> Menu {
    menu(
        "Power",
        "mdi mdi-flash",
        vec![group(
            "Power",
            vec![
                model_item("dcim", "powerfeed", "Power Feeds", ADD_IMPORT),
                model_item("dcim", "powerpanel", "Power Panels", ADD_IMPORT),
            ],
        )],
    )
}

fn other_menu() -> Menu {
    menu(
        "Other",
        "mdi mdi-notification-clear-all",
        vec![
            group(
                "Logging",
                vec![
                    model_item("extras", "journalentry", "Journal Entries", IMPORT),
                    model_item("extras", "objectchange", "Change Log", &[]),
                ],
            ),
            group(
                "Customization",
                vec![
                    model_item("extras", "customfield", "Custom Fields", ADD_IMPORT),
                    model_item("extras", "customlink", "Custom Links", ADD_IMPORT),
                    model_item("extras", "exporttemplate", "Export Templates", ADD_IMPORT),
                ],
            ),
            group(
                "Integrations",
                vec![
                    model_item("extras", "webhook", "Webhooks", ADD_IMPORT),
                    MenuItem::link("extras:report_list", "Reports", "extras.view_report"),
                    MenuItem::link("extras:script_list", "Scripts", "extras.view_script"),
                ],
            ),
            group(
                "Other",
                vec![
                    model_item("extras", "tag", "Tags", ADD_IMPORT),
                    model_item("extras", "configcontext", "Config Contexts", &[Action::Add]),
                ],
            ),
        ],
    )
}

/// Fixed menus plus menu items registered by extensions.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MenuRegistry {
    menus: Vec<Menu>,
    extensions: Vec<MenuGroup>,
}

impl MenuRegistry {
    pub fn with_defaults() -> MenuRegistry {
        MenuRegistry {
            menus: vec![
                organization_menu(),
                devices_menu(),
                connections_menu(),
                ipam_menu(),
                virtualization_menu(),
                circuits_menu(),
                power_menu(),
                other_menu(),
            ],
            extensions: vec![],
        }
    }

    /// Add an extension's items as one group of the "Plugins" menu.
    ///
    /// Registering the same name again appends to its group.
    pub fn register_extension(&mut self, name: &str, items: Vec<MenuItem>) {
        log::debug!("Registering {} menu items for extension '{name}'", items.len());
        match self.extensions.iter_mut().find(|g| g.label == name) {
            Some(existing) => existing.items.extend(items),
            None => self.extensions.push(group(name, items)),
        }
    }

    /// All menus, with a trailing "Plugins" menu when extensions registered items.
    pub fn menus(&self) -> Vec<Menu> {
        let mut menus = self.menus.clone();
        if !self.extensions.is_empty() {
            menus.push(menu("Plugins", "mdi mdi-puzzle", self.extensions.clone()));
        }
        menus
    }

    /// Menus as seen by a user: items, groups and menus the user cannot view are left out.
    pub fn visible_menus(&self, permissions: &Permissions) -> Vec<Menu> {
        self.menus()
            .into_iter()
            .filter_map(|mut menu| {
                menu.groups = menu
                    .groups
                    .into_iter()
                    .filter_map(|mut group| {
                        group.items = group
                            .items
                            .into_iter()
                            .filter(|item| permissions.has_all(&item.permissions))
                            .map(|mut item| {
                                item.buttons.retain(|b| permissions.has_all(&b.permissions));
                                item
                            })
                            .collect();
                        (!group.items.is_empty()).then_some(group)
                    })
                    .collect();
                (!menu.groups.is_empty()).then_some(menu)
            })
            .collect()
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FreightError {
    #[error("unknown container type: {0}")]
    UnknownContainerType(String),
    #[error("FCL pricing needs a container type")]
    ContainerTypeRequired,
    #[error("no {} container types in the rate catalog", fleet_label(.reefer))]
    EmptyContainerCatalog { reefer: bool },
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("invalid shipment values: {0}")]
    InvalidShipmentValues(String),
}

fn fleet_label(reefer: &bool) -> &'static str {
    if *reefer {
        "reefer"
    } else {
        "general purpose"
    }
}

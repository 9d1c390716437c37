//! Player inputs accepted by a [`GameSession`](crate::session::GameSession).
use serde::{Deserialize, Serialize};

use crate::constants::{
    AUCTION_BID_COST, GARAGE_UPGRADE_COST, POWER_PURCHASE_COST, WANTED_REDUCTION_COST,
};
use crate::vehicle::Vehicle;

/// Which of the two offered outcomes the player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Primary,
    Secondary,
}

/// Purchases available from the garage, market, auction and status screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopSku {
    GarageUpgrade,
    BuySedan,
    BuySport,
    AuctionBid,
    AuctionSabotage,
    BuyPower,
    ReduceWanted,
}

impl ShopSku {
    pub const ALL: [Self; 7] = [
        Self::GarageUpgrade,
        Self::BuySedan,
        Self::BuySport,
        Self::AuctionBid,
        Self::AuctionSabotage,
        Self::BuyPower,
        Self::ReduceWanted,
    ];

    /// Up-front price; the purchase is skipped when cash is below it.
    #[must_use]
    pub fn cost(self) -> i32 {
        match self {
            Self::GarageUpgrade => GARAGE_UPGRADE_COST,
            Self::BuySedan => Vehicle::sedan().price,
            Self::BuySport => Vehicle::sport().price,
            Self::AuctionBid => AUCTION_BID_COST,
            Self::AuctionSabotage => 0,
            Self::BuyPower => POWER_PURCHASE_COST,
            Self::ReduceWanted => WANTED_REDUCTION_COST,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::GarageUpgrade => "garage_upgrade",
            Self::BuySedan => "buy_sedan",
            Self::BuySport => "buy_sport",
            Self::AuctionBid => "auction_bid",
            Self::AuctionSabotage => "auction_sabotage",
            Self::BuyPower => "buy_power",
            Self::ReduceWanted => "reduce_wanted",
        }
    }
}

/// Entries of the main menu, in cursor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuEntry {
    Travel,
    Missions,
    Garage,
    Market,
    Auction,
    Status,
}

impl MenuEntry {
    pub const ALL: [Self; 6] = [
        Self::Travel,
        Self::Missions,
        Self::Garage,
        Self::Market,
        Self::Auction,
        Self::Status,
    ];

    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Travel => "menu.travel",
            Self::Missions => "menu.missions",
            Self::Garage => "menu.garage",
            Self::Market => "menu.market",
            Self::Auction => "menu.auction",
            Self::Status => "menu.status",
        }
    }
}

/// Every transition the engine understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Enter the menu, or move the cursor when already in it.
    OpenMenu,
    SelectMenu,
    Back,
    ShowTravel,
    ShowMissions,
    Travel {
        target: String,
    },
    TravelRandom,
    TravelToMissionTarget,
    AcceptMission,
    CancelMission,
    DeliverMission,
    ChooseEncounterOption {
        choice: Choice,
    },
    ChooseMissionMethod {
        choice: Choice,
    },
    Shop {
        sku: ShopSku,
    },
}

impl Action {
    /// Stable name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenMenu => "open_menu",
            Self::SelectMenu => "select_menu",
            Self::Back => "back",
            Self::ShowTravel => "show_travel",
            Self::ShowMissions => "show_missions",
            Self::Travel { .. } => "travel",
            Self::TravelRandom => "travel_random",
            Self::TravelToMissionTarget => "travel_to_mission_target",
            Self::AcceptMission => "accept_mission",
            Self::CancelMission => "cancel_mission",
            Self::DeliverMission => "deliver_mission",
            Self::ChooseEncounterOption { .. } => "choose_encounter_option",
            Self::ChooseMissionMethod { .. } => "choose_mission_method",
            Self::Shop { .. } => "shop",
        }
    }
}

//! Centralized balance and tuning constants for OpenCity game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! data files.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_SESSION_START: &str = "log.session.start";
pub(crate) const LOG_TRAVEL_ARRIVED: &str = "log.travel.arrived";
pub(crate) const LOG_TRAVEL_NO_NEIGHBORS: &str = "log.travel.no-neighbors";
pub(crate) const LOG_RAID_TRIGGERED: &str = "log.raid.triggered";
pub(crate) const LOG_RAID_SURRENDER: &str = "log.raid.surrender";
pub(crate) const LOG_RAID_FLEE_ESCAPED: &str = "log.raid.flee.escaped";
pub(crate) const LOG_RAID_FLEE_CAUGHT: &str = "log.raid.flee.caught";
pub(crate) const LOG_ENCOUNTER_TRIGGERED: &str = "log.encounter.triggered";
pub(crate) const LOG_POLICE_COMPLY_CLEARED: &str = "log.police.comply.cleared";
pub(crate) const LOG_POLICE_COMPLY_FINED: &str = "log.police.comply.fined";
pub(crate) const LOG_POLICE_FLEE_ESCAPED: &str = "log.police.flee.escaped";
pub(crate) const LOG_POLICE_FLEE_CAUGHT: &str = "log.police.flee.caught";
pub(crate) const LOG_GANG_PAID: &str = "log.gang.paid";
pub(crate) const LOG_GANG_FLEE_ESCAPED: &str = "log.gang.flee.escaped";
pub(crate) const LOG_GANG_FLEE_ROBBED: &str = "log.gang.flee.robbed";
pub(crate) const LOG_DEAL_ACCEPTED: &str = "log.deal.accepted";
pub(crate) const LOG_DEAL_DECLINED: &str = "log.deal.declined";
pub(crate) const LOG_CASH_TAKEN: &str = "log.found-cash.taken";
pub(crate) const LOG_CASH_LEFT: &str = "log.found-cash.left";
pub(crate) const LOG_MISSION_ACCEPTED: &str = "log.mission.accepted";
pub(crate) const LOG_MISSION_POOL_EMPTY: &str = "log.mission.pool-empty";
pub(crate) const LOG_MISSION_CANCELLED: &str = "log.mission.cancelled";
pub(crate) const LOG_MISSION_COMPLETED: &str = "log.mission.completed";
pub(crate) const LOG_HEIST_FAILED: &str = "log.heist.failed";
pub(crate) const LOG_TAIL_SPOTTED: &str = "log.tail.spotted";
pub(crate) const LOG_TAIL_LOST: &str = "log.tail.lost";
pub(crate) const LOG_SHOP_DECLINED: &str = "log.shop.insufficient-funds";
pub(crate) const LOG_GARAGE_UPGRADED: &str = "log.garage.upgraded";
pub(crate) const LOG_VEHICLE_PURCHASED: &str = "log.market.purchased";
pub(crate) const LOG_AUCTION_BID: &str = "log.auction.bid";
pub(crate) const LOG_AUCTION_SABOTAGE_PAID: &str = "log.auction.sabotage.paid";
pub(crate) const LOG_AUCTION_SABOTAGE_BURNED: &str = "log.auction.sabotage.burned";
pub(crate) const LOG_POWER_GAINED: &str = "log.status.power";
pub(crate) const LOG_WANTED_REDUCED: &str = "log.status.wanted-reduced";

// Profile bounds -----------------------------------------------------------
pub const DEFAULT_STARTING_CASH: i32 = 1_500;
pub const WANTED_MAX: i32 = 100;
pub const WANTED_MIN: i32 = 0;

// Encounter tuning ---------------------------------------------------------
pub(crate) const ENCOUNTER_CHANCE_CAP: i32 = 90;
pub(crate) const ENCOUNTER_ROLL_SPAN: i32 = 100;
pub(crate) const HIGH_WANTED_THRESHOLD: i32 = 60;
pub(crate) const RAID_WANTED_THRESHOLD: i32 = 80;
pub(crate) const RAID_CHANCE: f64 = 0.35;

// Raid resolution ----------------------------------------------------------
pub(crate) const RAID_SURRENDER_FINE: i32 = 300;
pub(crate) const RAID_SURRENDER_WANTED_RELIEF: i32 = 25;
pub(crate) const RAID_FLEE_BASE: f64 = 0.2;
pub(crate) const RAID_FLEE_STEALTH_WEIGHT: f64 = 0.6;
pub(crate) const RAID_FLEE_ESCAPE_HEAT: i32 = 10;
pub(crate) const RAID_FLEE_CAUGHT_FINE: i32 = 500;
pub(crate) const RAID_FLEE_CAUGHT_HEAT: i32 = 25;

// Encounter resolution -----------------------------------------------------
pub(crate) const POLICE_COMPLY_CLEAR_CHANCE: f64 = 0.7;
pub(crate) const POLICE_COMPLY_RELIEF: i32 = 5;
pub(crate) const POLICE_COMPLY_FINE: i32 = 100;
pub(crate) const POLICE_COMPLY_FINE_HEAT: i32 = 5;
pub(crate) const POLICE_FLEE_BASE: f64 = 0.3;
pub(crate) const POLICE_FLEE_STEALTH_WEIGHT: f64 = 0.5;
pub(crate) const POLICE_FLEE_ESCAPE_HEAT: i32 = 5;
pub(crate) const POLICE_FLEE_CAUGHT_FINE: i32 = 150;
pub(crate) const POLICE_FLEE_CAUGHT_HEAT: i32 = 15;
pub(crate) const GANG_TRIBUTE: i32 = 200;
pub(crate) const GANG_FLEE_CHANCE: f64 = 0.5;
pub(crate) const GANG_FLEE_ESCAPE_HEAT: i32 = 5;
pub(crate) const GANG_FLEE_ROBBED: i32 = 250;
pub(crate) const STREET_DEAL_PAYOUT: i32 = 150;
pub(crate) const STREET_DEAL_HEAT: i32 = 10;
pub(crate) const FOUND_CASH_AMOUNT: i32 = 100;

// Mission generation -------------------------------------------------------
pub(crate) const DELIVERY_RISK_RANGE: (i32, i32) = (10, 60);
pub(crate) const DELIVERY_REWARD_BASE: f32 = 150.0;
pub(crate) const DELIVERY_REWARD_PER_RISK: f32 = 8.0;
pub(crate) const HEIST_RISK_RANGE: (i32, i32) = (40, 90);
pub(crate) const HEIST_REWARD_BASE: f32 = 800.0;
pub(crate) const HEIST_REWARD_PER_RISK: f32 = 15.0;
pub(crate) const TAIL_RISK_RANGE: (i32, i32) = (20, 70);
pub(crate) const TAIL_REWARD_BASE: f32 = 300.0;
pub(crate) const TAIL_REWARD_PER_RISK: f32 = 10.0;

// Mission resolution -------------------------------------------------------
pub(crate) const COMPLETION_HEAT_PER_RISK: f32 = 0.2;
pub(crate) const HEIST_SILENT_BASE: f64 = 0.55;
pub(crate) const HEIST_SILENT_HEAT: i32 = 20;
pub(crate) const HEIST_SILENT_FAIL_LOSS: i32 = 200;
pub(crate) const HEIST_SILENT_FAIL_HEAT: i32 = 30;
pub(crate) const HEIST_AGGRESSIVE_BASE: f64 = 0.7;
pub(crate) const HEIST_AGGRESSIVE_BONUS: f32 = 1.2;
pub(crate) const HEIST_AGGRESSIVE_HEAT: i32 = 35;
pub(crate) const HEIST_AGGRESSIVE_FAIL_LOSS: i32 = 400;
pub(crate) const HEIST_AGGRESSIVE_FAIL_HEAT: i32 = 45;
pub(crate) const TAIL_CLOSE_BASE: f64 = 0.7;
pub(crate) const TAIL_CLOSE_FAIL_HEAT: i32 = 10;
pub(crate) const TAIL_DISTANT_BASE: f64 = 0.45;

// Power curve --------------------------------------------------------------
pub(crate) const POWER_MULTIPLIER_CEILING: f64 = 0.75;
pub(crate) const POWER_HALF_SCALE: f64 = 50.0;

// Shop tuning --------------------------------------------------------------
pub(crate) const GARAGE_UPGRADE_COST: i32 = 300;
pub(crate) const GARAGE_SPEED_GAIN: f32 = 0.2;
pub(crate) const GARAGE_STEALTH_GAIN: f32 = 0.05;
pub(crate) const AUCTION_BID_COST: i32 = 200;
pub(crate) const AUCTION_SABOTAGE_BASE: f64 = 0.5;
pub(crate) const AUCTION_SABOTAGE_PAYOUT: i32 = 50;
pub(crate) const AUCTION_SABOTAGE_HEAT: i32 = 10;
pub(crate) const POWER_PURCHASE_COST: i32 = 0;
pub(crate) const POWER_PURCHASE_GAIN: u32 = 5;
pub(crate) const WANTED_REDUCTION_COST: i32 = 250;
pub(crate) const WANTED_REDUCTION_AMOUNT: i32 = 15;

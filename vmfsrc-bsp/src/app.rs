//! Identifiers for the games whose BSP dialects need special handling.
//!
//! Kept as a plain integer (Steam application id) so unknown games pass
//! through untouched and are treated as generic Source maps.

pub type AppId = i32;

pub const UNKNOWN: AppId = 0;
pub const HALF_LIFE_2: AppId = 220;
pub const LEFT_4_DEAD_2: AppId = 550;
pub const DARK_MESSIAH: AppId = 2100;
pub const TACTICAL_INTERVENTION: AppId = 51100;
pub const VINDICTUS: AppId = 212160;
pub const CONTAGION: AppId = 238430;
pub const STRATA_SOURCE: AppId = 600040;
pub const TITANFALL: AppId = 1454890;

// src/config/consts.rs

// Calendar service
pub const CALENDAR_ENDPOINT: &str = "https://calendar.google.com/calendar/render";

// Popup opened on activation (centered on screen)
pub const POPUP_WIDTH: u32 = 800;
pub const POPUP_HEIGHT: u32 = 700;
pub const POPUP_TARGET: &str = "googleCalendarPopup";
pub const FALLBACK_SCREEN: (u32, u32) = (1920, 1080);

// Injected markup
pub const BUTTON_CLASS: &str = "espn-cal-link-button";
pub const BUTTON_LABEL: &str = "📅 Add to Calendar";
pub const BUTTON_TITLE: &str = "Add this game to Google Calendar";
pub const WRAPPER_CLASS: &str = "espn-cal-link-time-wrapper";
pub const WRAPPER_STYLE: &str = "display:flex;align-items:center;gap:8px";

// Layout families (matched against the address hostname)
pub const KENPOM_HOST: &str = "kenpom.com";
pub const ESPN_HOST: &str = "espn.";
pub const KENPOM_ID_PREFIX: &str = "kenpom-";
pub const KENPOM_DATE_PARAM: &str = "d";

// Placeholders seen in place of real values
pub const TIME_PLACEHOLDER: &str = "TBD";
pub const NETWORK_PLACEHOLDER: &str = "--";

// Live updates
pub const DEBOUNCE_MS: u64 = 500;

// Local files
pub const LOG_FILE: &str = ".store/debug.log";
pub const DEFAULT_OUT_DIR: &str = "out";

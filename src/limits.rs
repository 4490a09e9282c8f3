use crate::model::Minute;

pub const MINUTES_PER_DAY: Minute = 24 * 60;

pub const MAX_LABEL_LEN: usize = 256;
pub const MAX_BOOKINGS_PER_BOARD: usize = 100_000;
pub const MAX_HORIZON_DAYS: u32 = 366;
pub const MAX_SCHEDULED_DAYS: usize = 3_660;

pub const MAX_BOARDS: usize = 1_000;
pub const MAX_BOARD_NAME_LEN: usize = 128;

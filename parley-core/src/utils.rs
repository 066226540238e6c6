/// Identity the relay uses for membership notifications.
pub const SERVER_IDENTITY: &str = "server";

/// Identity the relay uses for pushed camera frames.
pub const CAMERA_IDENTITY: &str = "server-camera";

pub const DEFAULT_ROOM: &str = "default-room";

pub const DEFAULT_STUN_ADDR: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun2.l.google.com:19302";

//! Canonical face-mesh indices used by the analyzers.
//!
//! "Left" and "right" refer to the image: left-side indices sit at lower x.

/// Entries in the canonical face mesh
pub const FACE_MESH_SIZE: usize = 468;
/// A set must have more entries than this to be analyzed
pub const MIN_LANDMARKS: usize = 400;

pub const FOREHEAD: usize = 10;
pub const CHIN: usize = 152;

pub const LEFT_EAR: usize = 234;
pub const RIGHT_EAR: usize = 454;

pub const LEFT_EYE_OUTER: usize = 33;
pub const RIGHT_EYE_OUTER: usize = 263;
pub const LEFT_EYE_INNER: usize = 133;
pub const RIGHT_EYE_INNER: usize = 362;

pub const LEFT_UPPER_LID: usize = 159;
pub const LEFT_LOWER_LID: usize = 145;
pub const RIGHT_UPPER_LID: usize = 386;
pub const RIGHT_LOWER_LID: usize = 374;

pub const LEFT_CHEEKBONE: usize = 116;
pub const RIGHT_CHEEKBONE: usize = 345;

pub const LEFT_JAW_ANGLE: usize = 172;
pub const RIGHT_JAW_ANGLE: usize = 397;
/// Mid-jaw points used for chin width
pub const LEFT_JAW_MID: usize = 136;
pub const RIGHT_JAW_MID: usize = 365;

pub const LEFT_MOUTH: usize = 61;
pub const RIGHT_MOUTH: usize = 291;

pub const LEFT_NOSTRIL: usize = 49;
pub const RIGHT_NOSTRIL: usize = 279;
pub const LEFT_FOLD_MID: usize = 206;
pub const RIGHT_FOLD_MID: usize = 426;

pub const LEFT_CHEEK_UPPER: [usize; 3] = [116, 123, 147];
pub const LEFT_CHEEK_LOWER: [usize; 3] = [192, 207, 213];
pub const RIGHT_CHEEK_UPPER: [usize; 3] = [345, 352, 376];
pub const RIGHT_CHEEK_LOWER: [usize; 3] = [416, 427, 433];

pub const LEFT_JAWLINE: [usize; 6] = [172, 136, 150, 149, 176, 148];
pub const RIGHT_JAWLINE: [usize; 6] = [377, 400, 378, 379, 365, 397];

pub const LEFT_JOWL: [usize; 6] = [136, 150, 149, 176, 148, 171];
pub const RIGHT_JOWL: [usize; 6] = [365, 379, 378, 400, 377, 395];

pub const LEFT_CROW_FEET: [usize; 9] = [33, 7, 163, 144, 145, 153, 154, 155, 133];
pub const RIGHT_CROW_FEET: [usize; 9] = [263, 249, 390, 373, 374, 380, 381, 382, 362];

pub const LEFT_UNDER_EYE: [usize; 9] = [159, 158, 157, 173, 133, 155, 154, 153, 145];
pub const RIGHT_UNDER_EYE: [usize; 9] = [386, 385, 384, 398, 362, 382, 381, 380, 374];

/// Between the brows
pub const GLABELLA: [usize; 9] = [9, 8, 168, 107, 336, 55, 285, 65, 295];
pub const LEFT_BROW: [usize; 5] = [70, 63, 105, 66, 107];
pub const RIGHT_BROW: [usize; 5] = [300, 293, 334, 296, 336];

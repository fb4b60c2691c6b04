/// Landmarks per hand delivered by the detection model.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
/// Middle finger MCP, used as the palm centre.
pub const PALM_CENTRE: usize = 9;
pub const THUMB_TIP: usize = 4;
pub const FINGER_TIPS: [usize; 4] = [8, 12, 16, 20];

/// Fingertip counts as extended past this multiple of the palm distance.
pub const FINGER_EXTENDED_RATIO: f32 = 1.7;
pub const THUMB_EXTENDED_RATIO: f32 = 1.3;

/// Open hand (this many or more) scatters, fist (this many or fewer) forms the tree.
pub const SCATTER_MIN_FINGERS: u8 = 3;
pub const TREE_MAX_FINGERS: u8 = 1;

/// Palm distances shorter than this are treated as a missing hand.
pub const MIN_REFERENCE_DISTANCE: f32 = 1.0e-4;

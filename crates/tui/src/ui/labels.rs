//! Translation keys for every user-visible label. Keys are the English
//! source strings; a [`Translator`](peerwait_util::Translator) maps them.

pub const USERNAME: &str = "Username";
pub const PEERS_ASSESSED: &str = "Peers Assessed";
pub const PEER_RESPONSES_RECEIVED: &str = "Peer Responses Received";
pub const TIME_SPENT: &str = "Time Spent On Current Step";
pub const STAFF_ASSESSMENT: &str = "Staff assessment";
pub const GRADE_STATUS: &str = "Grade Status";

pub const REFRESH: &str = "Refresh";
pub const SEARCH_LEARNER: &str = "Search learner";
pub const SELECT_ONE_ROW: &str = "You must select one row";
pub const NO_LEARNERS: &str = "No learners are waiting";

pub const LOADING: &str = "Loading waiting step details";
pub const FETCH_ERROR: &str = "Error while fetching student data.";
pub const RETRY_HINT: &str = "Press r to try again.";
pub const MUST_GRADE: &str = "Must grade";
pub const MUST_BE_GRADED_BY: &str = "Must be graded by";
pub const LOOKING_UP: &str = "Looking up learner";

/// Column headers in display order.
pub const COLUMNS: [&str; 6] = [
    USERNAME,
    PEERS_ASSESSED,
    PEER_RESPONSES_RECEIVED,
    TIME_SPENT,
    STAFF_ASSESSMENT,
    GRADE_STATUS,
];

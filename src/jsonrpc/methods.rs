//! JSON-RPC method name constants

pub const CREATE_INCIDENT: &str = "civicalert/incident/create";
pub const CONFIRM_INCIDENT: &str = "civicalert/incident/confirm";
pub const GET_INCIDENT: &str = "civicalert/incident/get";
pub const LIST_INCIDENTS: &str = "civicalert/incident/list";
pub const SET_STATUS: &str = "civicalert/incident/set_status";
pub const SET_SEVERITY: &str = "civicalert/incident/set_severity";
pub const ADD_NOTE: &str = "civicalert/incident/add_note";
pub const MARK_FALSE_REPORT: &str = "civicalert/incident/mark_false_report";
pub const GET_STATS: &str = "civicalert/stats";
pub const LOGIN: &str = "civicalert/auth/login";
pub const LOGOUT: &str = "civicalert/auth/logout";

/// All supported CivicAlert JSON-RPC methods
pub const ALL_METHODS: &[&str] = &[
    CREATE_INCIDENT,
    CONFIRM_INCIDENT,
    GET_INCIDENT,
    LIST_INCIDENTS,
    SET_STATUS,
    SET_SEVERITY,
    ADD_NOTE,
    MARK_FALSE_REPORT,
    GET_STATS,
    LOGIN,
    LOGOUT,
];

/// Methods that need a staff session token in their params
pub const STAFF_METHODS: &[&str] = &[SET_STATUS, SET_SEVERITY, ADD_NOTE, MARK_FALSE_REPORT, GET_STATS];

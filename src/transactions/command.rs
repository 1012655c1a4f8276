use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Create,
    Login,
    Logout,
    View,
    Deposit,
    Withdraw,
    Transfer,
}

/// One row of a command file. Cells stay raw strings so that bad numbers
/// reach the ledger and come back as ordinary feedback instead of aborting
/// the whole run.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRecord {
    #[serde(rename = "type")]
    pub cmd_type: CommandType,
    pub account: Option<String>,
    pub pin: Option<String>,
    pub name: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<String>,
}

impl CommandRecord {
    pub fn new(cmd_type: CommandType) -> Self {
        Self {
            cmd_type,
            account: None,
            pin: None,
            name: None,
            receiver: None,
            amount: None,
        }
    }
}

mod error;

pub use error::CommandError;

use serde_json::Value;
use std::collections::BTreeMap;

use crate::api::ApiClient;

/// One named argument a command accepts, declared once per variant.
#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub key: &'static str,
    pub description: &'static str,
    pub mandatory: bool,
}

const HOST: ArgSpec = ArgSpec {
    key: "host",
    description: "hostname to scan",
    mandatory: true,
};

const RESCAN: ArgSpec = ArgSpec {
    key: "rescan",
    description: "force a fresh scan instead of a cached result",
    mandatory: false,
};

const HIDDEN: ArgSpec = ArgSpec {
    key: "hidden",
    description: "keep the result out of the recent-scans listing",
    mandatory: false,
};

const MAX: ArgSpec = ArgSpec {
    key: "max",
    description: "maximum score",
    mandatory: false,
};

const MIN: ArgSpec = ArgSpec {
    key: "min",
    description: "minimum score",
    mandatory: false,
};

const ID: ArgSpec = ArgSpec {
    key: "id",
    description: "scan_id number from a scan object",
    mandatory: true,
};

/// Parsed `key=value` and bare-key tokens for one invocation. Unknown keys
/// are stored but never read, so commands stay forward-compatible.
#[derive(Debug, Default, Clone)]
pub struct CommandArgs {
    values: BTreeMap<String, String>,
}

impl CommandArgs {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut args = Self::default();
        for token in tokens {
            let token = token.as_ref();
            if token.starts_with('-') {
                continue;
            }
            match token.split_once('=') {
                Some((key, value)) => args.set(key, value),
                None => args.set_flag(token),
            }
        }
        args
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn set_flag(&mut self, key: &str) {
        self.values.insert(key.to_string(), String::new());
    }

    /// Non-empty value for `key`, if one was given as `key=value`.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// True if `key` appeared at all, bare or with a value.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// The commands the client understands. Each variant fixes its CLI
/// spellings, the remote operation, and its argument contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GradeDistribution,
    ScannerStates,
    RecentScans,
    InvokeAssessment,
    RetrieveAssessment,
    RetrieveTestResults,
    Help,
}

impl Command {
    /// Commands reachable from the CLI, in help/dispatch order.
    /// `RetrieveAssessment` shares its spellings with `InvokeAssessment`
    /// and is only invoked programmatically by the poller.
    pub const CLI: [Command; 6] = [
        Command::GradeDistribution,
        Command::ScannerStates,
        Command::RecentScans,
        Command::InvokeAssessment,
        Command::RetrieveTestResults,
        Command::Help,
    ];

    pub fn long_name(self) -> &'static str {
        match self {
            Command::GradeDistribution => "--gradeDistribution",
            Command::ScannerStates => "--scannerStates",
            Command::RecentScans => "--recentScans",
            Command::InvokeAssessment | Command::RetrieveAssessment => "--retrieveAssessment",
            Command::RetrieveTestResults => "--retrieveTestResult",
            Command::Help => "--help",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Command::GradeDistribution => "-g",
            Command::ScannerStates => "-s",
            Command::RecentScans => "-r",
            Command::InvokeAssessment | Command::RetrieveAssessment => "-a",
            Command::RetrieveTestResults => "-t",
            Command::Help => "-h",
        }
    }

    /// The logical operation name the remote service knows this command by.
    /// `Help` is local-only.
    pub fn operation(self) -> Option<&'static str> {
        match self {
            Command::GradeDistribution => Some("getGradeDistribution"),
            Command::ScannerStates => Some("getScannerStates"),
            Command::RecentScans => Some("getRecentScans"),
            Command::InvokeAssessment | Command::RetrieveAssessment => Some("analyze"),
            Command::RetrieveTestResults => Some("getScanResults"),
            Command::Help => None,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Command::GradeDistribution => "Grade distribution",
            Command::ScannerStates => "Scanner states",
            Command::RecentScans => "Recent scans",
            Command::InvokeAssessment => "Invoke assessment",
            Command::RetrieveAssessment => "Retrieve assessment",
            Command::RetrieveTestResults => "Test results",
            Command::Help => "Help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::GradeDistribution => {
                "Returns each possible grade, as well as how many scans have fallen into that grade."
            }
            Command::ScannerStates => {
                "Returns the state of the scanner, useful for determining how busy the service is."
            }
            Command::RecentScans => {
                "Retrieve the ten most recent scans that fall within a given score range."
            }
            Command::InvokeAssessment => {
                "Invoke a scan of a website and wait for it to finish. The service returns a \
                 cached result if the site has been scanned within the previous 24 hours."
            }
            Command::RetrieveAssessment => {
                "Retrieve the results of an existing, ongoing, or completed scan."
            }
            Command::RetrieveTestResults => {
                "Retrieves the individual subtest results of the scan with the given id."
            }
            Command::Help => "Print out usage information.",
        }
    }

    pub fn arguments(self) -> &'static [ArgSpec] {
        match self {
            Command::GradeDistribution | Command::ScannerStates | Command::Help => &[],
            Command::RecentScans => &[MAX, MIN],
            Command::InvokeAssessment => &[HOST, RESCAN, HIDDEN],
            Command::RetrieveAssessment => &[HOST],
            Command::RetrieveTestResults => &[ID],
        }
    }

    pub fn matches(self, token: &str) -> bool {
        token == self.long_name() || token == self.short_name()
    }

    /// Parse the token list against this command's argument contract.
    /// Fails only when a mandatory key has no non-empty value.
    pub fn validate<S: AsRef<str>>(self, tokens: &[S]) -> Result<CommandArgs, CommandError> {
        let args = CommandArgs::from_tokens(tokens);
        for spec in self.arguments() {
            if spec.mandatory && args.value_of(spec.key).is_none() {
                return Err(CommandError::MissingArgument { key: spec.key });
            }
        }
        Ok(args)
    }

    /// Issue this command's single remote call. `Help` never reaches the
    /// network and yields a null payload.
    pub fn execute(self, client: &dyn ApiClient, args: &CommandArgs) -> Result<Value, CommandError> {
        match self {
            Command::GradeDistribution => {
                let payload = client.get("getGradeDistribution", &[])?;
                check_refusal(&payload)
            }
            Command::ScannerStates => {
                let payload = client.get("getScannerStates", &[])?;
                check_refusal(&payload)
            }
            Command::RecentScans => {
                let mut params = Vec::new();
                if let Some(max) = args.value_of("max") {
                    params.push(("max", max));
                }
                if let Some(min) = args.value_of("min") {
                    params.push(("min", min));
                }
                let payload = client.get("getRecentScans", &params)?;
                check_refusal(&payload)
            }
            Command::InvokeAssessment => {
                let host = args
                    .value_of("host")
                    .ok_or(CommandError::MissingArgument { key: "host" })?;
                let rescan = if args.has("rescan") { "true" } else { "false" };
                let hidden = if args.has("hidden") { "true" } else { "false" };

                let payload = client.post(
                    "analyze",
                    &[("host", host)],
                    &[("rescan", rescan), ("hidden", hidden)],
                )?;
                check_refusal(&payload)
            }
            Command::RetrieveAssessment => {
                let host = args
                    .value_of("host")
                    .ok_or(CommandError::MissingArgument { key: "host" })?;
                let payload = client.get("analyze", &[("host", host)])?;
                check_refusal(&payload)
            }
            Command::RetrieveTestResults => {
                let id = args
                    .value_of("id")
                    .ok_or(CommandError::MissingArgument { key: "id" })?;
                let payload = client.get("getScanResults", &[("scan", id)])?;
                check_refusal(&payload)
            }
            Command::Help => Ok(Value::Null),
        }
    }
}

/// A transport-successful payload can still carry a service-level refusal
/// in its `error` field. The rescan cooldown gets its own kind so callers
/// can tell "wait and retry" apart from other refusals.
fn check_refusal(payload: &Value) -> Result<Value, CommandError> {
    let Some(error) = payload.get("error").and_then(Value::as_str) else {
        return Ok(payload.clone());
    };

    if error == "rescan-attempt-too-soon" {
        return Err(CommandError::RescanTooSoon);
    }

    let text = payload
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or(error);
    Err(CommandError::Refused(text.to_string()))
}

/// Ordered collection of the CLI commands; owns dispatch-by-name and the
/// data behind help rendering.
pub struct Registry {
    commands: Vec<Command>,
}

impl Registry {
    pub fn new() -> Self {
        let commands = Command::CLI.to_vec();
        debug_assert!(names_unique(&commands), "command names must be unique");
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// First command whose long or short name appears among the tokens.
    pub fn find<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Command> {
        self.commands
            .iter()
            .copied()
            .find(|command| tokens.iter().any(|t| command.matches(t.as_ref())))
    }

    /// Validate and execute the first matching command. At most one command
    /// runs per invocation.
    pub fn dispatch<S: AsRef<str>>(
        &self,
        client: &dyn ApiClient,
        tokens: &[S],
    ) -> Result<Dispatched, CommandError> {
        let command = self.find(tokens).ok_or(CommandError::UnknownCommand)?;
        let args = command.validate(tokens)?;
        let payload = command.execute(client, &args)?;
        Ok(Dispatched { command, payload })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct Dispatched {
    pub command: Command,
    pub payload: Value,
}

fn names_unique(commands: &[Command]) -> bool {
    for (i, a) in commands.iter().enumerate() {
        for b in &commands[i + 1..] {
            if a.long_name() == b.long_name() || a.short_name() == b.short_name() {
                return false;
            }
        }
    }
    true
}

//! Real-shaped `Game.log` lines and tempfile helpers.
//!
//! The lines mirror what the game client actually writes; the classifier's
//! trigger phrases are derived from these shapes, so keep them verbatim.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const KILL_LINE: &str = "<2024-04-02T21:14:03.517Z> [Notice] <Actor Death> CActor::Kill: 'Dax_Vapor' [202100311242] in zone 'OOC_Stanton_1a' killed by 'RedlineMara' [201942231877] using 'behr_lmg_ballistic_01' [Class unknown] with damage type 'Bullet' from direction x: -0.3, y: 0.8, z: 0.5";

pub const SPAWN_LINE: &str = "<2024-04-02T21:16:44.002Z> [Notice] <Spawn Flow> CPlayerSpawnRequestHandler::OnSpawnpointLost: Player 'RedlineMara' [201942231877] lost reservation for spawnpoint Bed_Medical [3441209876] at location -18421";

pub const CORPSE_LINE: &str = "<2024-04-02T21:18:01.330Z> [Notice] <[ActorState] Corpse> [ACTOR STATE][SSCActorStateCVars::LogCorpse] Player 'Dax_Vapor' <remote client>: IsCorpseEnabled: No, there is no local inventory.";

pub const CORPSE_ENABLED_LINE: &str = "<2024-04-02T21:18:02.104Z> [Notice] <[ActorState] Corpse> [ACTOR STATE][SSCActorStateCVars::LogCorpse] Player 'Dax_Vapor' <remote client>: IsCorpseEnabled: Yes.";

pub const ZONE_LINE: &str = "<2024-04-02T21:20:13.940Z> [Notice] <CEntitySystem::MoveZoneHostedChild> moving zone hosted child id = 12345 name = \"Dax_Vapor\" to unblock removal of parent id = 67890 name = \"ANVL_Carrack_201\" into zone host id = 555 name = \"OOC_Stanton_1a\"";

pub const STATUS_START_LINE: &str = "<2024-04-02T21:21:00.000Z> [Notice] <BodyHealthComponent> Logged a start of a status effect! nickname: Dax_Vapor, status effect: BleedingOut";

pub const STATUS_END_LINE: &str = "<2024-04-02T21:22:30.000Z> [Notice] <BodyHealthComponent> Logged an end of a status effect! nickname: Dax_Vapor, status effect: BleedingOut";

pub const HIT_LINE: &str = "<2024-04-02T21:23:11.870Z> [Notice] <Debug Hostility Events> CSCBodyHealthComponent: Fake hit FROM RedlineMara TO Dax_Vapor. Being sent to child hostility_child_01";

pub const VEHICLE_LINE: &str = "<2024-04-02T21:25:40.220Z> [Notice] <Vehicle Destruction> CVehicle::OnAdvanceDestroyLevel: Vehicle 'ANVL_Carrack_201' [9300212] in zone 'OOC_Stanton_1a' [pos x: 1.0, y: 2.0, z: 3.0] driven by 'Dax_Vapor' [202100311242] advanced from destroy level 0 to 1 caused by 'RedlineMara' [201942231877] with 'Combat'";

/// The login line naming the local player.
pub const LOGIN_LINE: &str = "<2024-04-02T20:58:01.000Z> [Notice] <AccountLoginCharacterStatus_Character> Character: createdAt 123 - updatedAt 456 - name RedlineMara - state STATE_CURRENT - nickname=\"RedlineMara\"";

/// A generic kill shape: bracketed non-RFC-3339 timestamp, prose body.
pub const GENERIC_KILL_LINE: &str =
    "[12:00:01] Actor 'Alice' has been killed by 'Bob' using weapon 'X'";

pub const UNRECOGNIZED_LINE: &str =
    "<2024-04-02T21:26:00.000Z> [Trace] CIG perf - frame time 16.6ms, nothing to see";

/// One line from each category, in a plausible session order.
pub fn session_lines() -> Vec<&'static str> {
    vec![
        LOGIN_LINE,
        KILL_LINE,
        SPAWN_LINE,
        CORPSE_LINE,
        ZONE_LINE,
        STATUS_START_LINE,
        HIT_LINE,
        VEHICLE_LINE,
    ]
}

/// Append `lines` to `path`, each terminated with a newline.
pub fn append_lines(path: &Path, lines: &[&str]) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("open log fixture for append");
    for line in lines {
        writeln!(file, "{line}").expect("append log fixture line");
    }
    file.sync_all().expect("flush log fixture");
}

/// Append raw bytes without adding a newline (for partial-line tests).
pub fn append_bytes(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("open log fixture for append");
    file.write_all(bytes).expect("append log fixture bytes");
    file.sync_all().expect("flush log fixture");
}

/// Truncate the file and write `lines` from scratch.
pub fn rewrite_lines(path: &Path, lines: &[&str]) {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    std::fs::write(path, content).expect("rewrite log fixture");
}

//! Packages that ship with the stock game and the file types they use.

/// File extension and the kind of content it holds
pub const FILE_TYPES: [(&str, &str); 6] = [
    ("u", "System"),
    ("uax", "Sound"),
    ("umx", "Music"),
    ("unr", "Map"),
    ("utx", "Texture"),
    ("uxx", "Cache"),
];

/// Stock packages by lowercase name, with their file extension
pub const DEFAULT_PACKAGES: &[(&str, &str)] = &[
    // System
    ("botpack", "u"),
    ("core", "u"),
    ("de", "u"),
    ("editor", "u"),
    ("engine", "u"),
    ("epiccustommodels", "u"),
    ("fire", "u"),
    ("ipdrv", "u"),
    ("ipserver", "u"),
    ("multimesh", "u"),
    ("relics", "u"),
    ("relicsbindings", "u"),
    ("ubrowser", "u"),
    ("umenu", "u"),
    ("unreali", "u"),
    ("unrealshare", "u"),
    ("utbrowser", "u"),
    ("utmenu", "u"),
    ("utserveradmin", "u"),
    ("uweb", "u"),
    ("uwindow", "u"),
    // Sounds
    ("activates", "uax"),
    ("addon1", "uax"),
    ("ambancient", "uax"),
    ("ambcity", "uax"),
    ("ambmodern", "uax"),
    ("amboutside", "uax"),
    ("announcer", "uax"),
    ("bossvoice", "uax"),
    ("dday", "uax"),
    ("dmatch", "uax"),
    ("doorsanc", "uax"),
    ("doorsmod", "uax"),
    ("extro", "uax"),
    ("female1voice", "uax"),
    ("female2voice", "uax"),
    ("femalesounds", "uax"),
    ("laddersounds", "uax"),
    ("male1voice", "uax"),
    ("male2voice", "uax"),
    ("malesounds", "uax"),
    ("noxxsnd", "uax"),
    ("openingwave", "uax"),
    ("pan1", "uax"),
    ("rain", "uax"),
    ("tutvoiceas", "uax"),
    ("tutvoicectf", "uax"),
    ("tutvoicedm", "uax"),
    ("tutvoicedom", "uax"),
    ("vrikers", "uax"),
    // Music
    ("botmca9", "umx"),
    ("botpck10", "umx"),
    ("cannon", "umx"),
    ("colossus", "umx"),
    ("course", "umx"),
    ("ending", "umx"),
    ("enigma", "umx"),
    ("firebr", "umx"),
    ("foregone", "umx"),
    ("godown", "umx"),
    ("lock", "umx"),
    ("mech8", "umx"),
    ("mission", "umx"),
    ("nether", "umx"),
    ("organic", "umx"),
    ("phantom", "umx"),
    ("razor-ub", "umx"),
    ("run", "umx"),
    ("saveme", "umx"),
    ("savemeg", "umx"),
    ("seeker", "umx"),
    ("seeker2", "umx"),
    ("skyward", "umx"),
    ("strider", "umx"),
    ("suprfist", "umx"),
    ("unworld2", "umx"),
    ("utmenu23", "umx"),
    ("uttitle", "umx"),
    ("wheels", "umx"),
    // Maps
    ("as-frigate", "unr"),
    ("as-guardia", "unr"),
    ("as-hispeed", "unr"),
    ("as-mazon", "unr"),
    ("as-oceanfloor", "unr"),
    ("as-overlord", "unr"),
    ("as-rook", "unr"),
    ("as-tutorial", "unr"),
    ("cityintro", "unr"),
    ("ctf-command", "unr"),
    ("ctf-coret", "unr"),
    ("ctf-cybrosis][", "unr"),
    ("ctf-darji16", "unr"),
    ("ctf-dreary", "unr"),
    ("ctf-eternalcave", "unr"),
    ("ctf-face", "unr"),
    ("ctf-face][", "unr"),
    ("ctf-gauntlet", "unr"),
    ("ctf-hallofgiants", "unr"),
    ("ctf-high", "unr"),
    ("ctf-hydro16", "unr"),
    ("ctf-kosov", "unr"),
    ("ctf-lavagiant", "unr"),
    ("ctf-niven", "unr"),
    ("ctf-november", "unr"),
    ("ctf-noxion16", "unr"),
    ("ctf-nucleus", "unr"),
    ("ctf-orbital", "unr"),
    ("ctf-tutorial", "unr"),
    ("dm-agony", "unr"),
    ("dm-arcanetemple", "unr"),
    ("dm-barricade", "unr"),
    ("dm-codex", "unr"),
    ("dm-conveyor", "unr"),
    ("dm-crane", "unr"),
    ("dm-curse][", "unr"),
    ("dm-cybrosis][", "unr"),
    ("dm-deck16][", "unr"),
    ("dm-fetid", "unr"),
    ("dm-fractal", "unr"),
    ("dm-gothic", "unr"),
    ("dm-grinder", "unr"),
    ("dm-healpod][", "unr"),
    ("dm-hyperblast", "unr"),
    ("dm-kgalleon", "unr"),
    ("dm-liandri", "unr"),
    ("dm-malevolence", "unr"),
    ("dm-mojo][", "unr"),
    ("dm-morbias][", "unr"),
    ("dm-morpheus", "unr"),
    ("dm-oblivion", "unr"),
    ("dm-peak", "unr"),
    ("dm-phobos", "unr"),
    ("dm-pressure", "unr"),
    ("dm-shrapnel][", "unr"),
    ("dm-spacenoxx", "unr"),
    ("dm-stalwart", "unr"),
    ("dm-stalwartxl", "unr"),
    ("dm-tempest", "unr"),
    ("dm-turbine", "unr"),
    ("dm-tutorial", "unr"),
    ("dm-zeto", "unr"),
    ("dom-cinder", "unr"),
    ("dom-condemned", "unr"),
    ("dom-cryptic", "unr"),
    ("dom-gearbolt", "unr"),
    ("dom-ghardhen", "unr"),
    ("dom-lament", "unr"),
    ("dom-leadworks", "unr"),
    ("dom-metaldream", "unr"),
    ("dom-olden", "unr"),
    ("dom-sesmar", "unr"),
    ("dom-tutorial", "unr"),
    ("entry", "unr"),
    ("eol_assault", "unr"),
    ("eol_challenge", "unr"),
    ("eol_ctf", "unr"),
    ("eol_deathmatch", "unr"),
    ("eol_domination", "unr"),
    ("eol_statues", "unr"),
    ("utcredits", "unr"),
    // Textures
    ("alfafx", "utx"),
    ("ancient", "utx"),
    ("arenatex", "utx"),
    ("belt_fx", "utx"),
    ("blufffx", "utx"),
    ("bossskins", "utx"),
    ("castle1", "utx"),
    ("chizraefx", "utx"),
    ("city", "utx"),
    ("commandoskins", "utx"),
    ("coret_fx", "utx"),
    ("creative", "utx"),
    ("credits", "utx"),
    ("crypt", "utx"),
    ("crypt2", "utx"),
    ("crypt_fx", "utx"),
    ("ctf", "utx"),
    ("dacomafem", "utx"),
    ("dacomaskins", "utx"),
    ("ddayfx", "utx"),
    ("decayeds", "utx"),
    ("detail", "utx"),
    ("dmeffects", "utx"),
    ("egypt", "utx"),
    ("egyptpan", "utx"),
    ("eol", "utx"),
    ("faces", "utx"),
    ("fcommandoskins", "utx"),
    ("female1skins", "utx"),
    ("female2skins", "utx"),
    ("fireeng", "utx"),
    ("flarefx", "utx"),
    ("fractalfx", "utx"),
    ("genearth", "utx"),
    ("genfluid", "utx"),
    ("genfx", "utx"),
    ("genin", "utx"),
    ("genterra", "utx"),
    ("genwarp", "utx"),
    ("gothfem", "utx"),
    ("gothskins", "utx"),
    ("greatfire", "utx"),
    ("greatfire2", "utx"),
    ("hubeffects", "utx"),
    ("indus1", "utx"),
    ("indus2", "utx"),
    ("indus3", "utx"),
    ("indus4", "utx"),
    ("indus5", "utx"),
    ("indus6", "utx"),
    ("indus7", "utx"),
    ("isvfx", "utx"),
    ("jwsky", "utx"),
    ("ladderfonts", "utx"),
    ("ladrarrow", "utx"),
    ("ladrstatic", "utx"),
    ("lavafx", "utx"),
    ("lian-x", "utx"),
    ("liquids", "utx"),
    ("male1skins", "utx"),
    ("male2skins", "utx"),
    ("male3skins", "utx"),
    ("menugr", "utx"),
    ("metalmys", "utx"),
    ("mine", "utx"),
    ("nalicast", "utx"),
    ("nalifx", "utx"),
    ("nivenfx", "utx"),
    ("noxxpack", "utx"),
    ("of1", "utx"),
    ("old_fx", "utx"),
    ("palettes", "utx"),
    ("phraelfx", "utx"),
    ("playrshp", "utx"),
    ("queen", "utx"),
    ("rainfx", "utx"),
    ("render", "utx"),
    ("rotatingu", "utx"),
    ("scripted", "utx"),
    ("sgirlskins", "utx"),
    ("shanechurch", "utx"),
    ("shaneday", "utx"),
    ("shanesky", "utx"),
    ("skaarj", "utx"),
    ("sktrooperskins", "utx"),
    ("skybox", "utx"),
    ("skycity", "utx"),
    ("slums", "utx"),
    ("soldierskins", "utx"),
    ("spacefx", "utx"),
    ("starship", "utx"),
    ("tcowmeshskins", "utx"),
    ("tcrystal", "utx"),
    ("terranius", "utx"),
    ("tnalimeshskins", "utx"),
    ("trenchesfx", "utx"),
    ("tskmskins", "utx"),
    ("ut", "utx"),
    ("ut_artfx", "utx"),
    ("utbase1", "utx"),
    ("utcrypt", "utx"),
    ("uttech1", "utx"),
    ("uttech2", "utx"),
    ("uttech3", "utx"),
    ("uwindowfonts", "utx"),
    ("xbpfx", "utx"),
    ("xfx", "utx"),
    ("xtortion", "utx"),
    ("xutfx", "utx"),
];

/// Brush actors and the movers derived from them
pub const BRUSH_CLASSES: [&str; 9] = [
    "AssertMover",
    "AttachMover",
    "Brush",
    "ElevatorMover",
    "GradualMover",
    "LoopMover",
    "MixMover",
    "Mover",
    "RotatingMover",
];

pub const MOVER_CLASSES: [&str; 8] = [
    "AssertMover",
    "AttachMover",
    "ElevatorMover",
    "GradualMover",
    "LoopMover",
    "MixMover",
    "Mover",
    "RotatingMover",
];

pub const MESH_CLASSES: [&str; 4] = ["Mesh", "LodMesh", "SkeletalMesh", "SkelModel"];

/// Stock packages left out of filtered dependency lists
pub const CORE_PACKAGES: [&str; 6] = ["botpack", "core", "engine", "unreali", "unrealshare", "uwindow"];

/// Extension of a stock package, ignoring ASCII case
pub fn default_package_ext(name: &str) -> Option<&'static str> {
    DEFAULT_PACKAGES
        .iter()
        .find(|(package, _)| package.eq_ignore_ascii_case(name))
        .map(|(_, ext)| *ext)
}

/// Kind of content stored in files with extension `ext`
pub fn file_type(ext: &str) -> Option<&'static str> {
    FILE_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, kind)| *kind)
}

pub fn is_core_package(name: &str) -> bool {
    CORE_PACKAGES
        .iter()
        .any(|package| package.eq_ignore_ascii_case(name))
}

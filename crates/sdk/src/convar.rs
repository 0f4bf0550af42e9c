//! ConVar type definitions
//!
//! This module provides the value-type tag, the index-based handles used to
//! reach registered variables and commands, and the raw `FCVAR_*` flag bits.

/// Invalid access index constant
pub const INVALID_ACCESS_INDEX: u16 = 0xFFFF;

/// ConVar value type enumeration
///
/// The discriminants are stable and double as indices into the type
/// descriptor table (`Invalid` has no slot there).
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Invalid = -1,
    Bool = 0,
    Int16 = 1,
    UInt16 = 2,
    Int32 = 3,
    UInt32 = 4,
    Int64 = 5,
    UInt64 = 6,
    Float32 = 7,
    Float64 = 8,
    String = 9,
    Color = 10,
    Vector2 = 11,
    Vector3 = 12,
    Vector4 = 13,
    QAngle = 14,
}

impl VarType {
    /// Number of concrete (non-invalid) types
    pub const COUNT: usize = 15;

    /// Every concrete type, in discriminant order
    pub const ALL: [VarType; Self::COUNT] = [
        Self::Bool,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float32,
        Self::Float64,
        Self::String,
        Self::Color,
        Self::Vector2,
        Self::Vector3,
        Self::Vector4,
        Self::QAngle,
    ];

    /// Check if this is a primitive (scalar, fixed-size) type
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
                | Self::Float32
                | Self::Float64
        )
    }

    /// Table index of this type, `None` for `Invalid`
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Invalid => None,
            other => Some(*other as i16 as usize),
        }
    }

    /// Convert a raw discriminant back into a type tag
    ///
    /// Out-of-range values map to `Invalid`.
    pub fn from_raw(raw: i16) -> Self {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::Invalid)
    }

    /// Human-readable type name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Bool => "bool",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Color => "color",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Vector4 => "vector4",
            Self::QAngle => "qangle",
        }
    }
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// ConVar reference - uses access index, NOT a pointer
///
/// The access index addresses the registry's variable table; the
/// registration index tells apart several registrations of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConVarRef {
    /// Access index into the registry's variable list
    /// 0xFFFF = invalid
    pub access_index: u16,
    /// Registration index (set when the variable is registered)
    pub registered_index: i32,
}

impl ConVarRef {
    /// Create a reference from its raw parts
    pub const fn new(access_index: u16, registered_index: i32) -> Self {
        Self {
            access_index,
            registered_index,
        }
    }

    /// Create an invalid reference
    pub const fn invalid() -> Self {
        Self {
            access_index: INVALID_ACCESS_INDEX,
            registered_index: 0,
        }
    }

    /// Check if this reference is valid
    pub fn is_valid(&self) -> bool {
        self.access_index != INVALID_ACCESS_INDEX
    }
}

impl Default for ConVarRef {
    fn default() -> Self {
        Self::invalid()
    }
}

/// ConCommand reference, shaped like [`ConVarRef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConCommandRef {
    /// Access index into the registry's command list
    /// 0xFFFF = invalid
    pub access_index: u16,
    /// Registration index (set when the command is registered)
    pub registered_index: i32,
}

impl ConCommandRef {
    /// Create a reference from its raw parts
    pub const fn new(access_index: u16, registered_index: i32) -> Self {
        Self {
            access_index,
            registered_index,
        }
    }

    /// Create an invalid reference
    pub const fn invalid() -> Self {
        Self {
            access_index: INVALID_ACCESS_INDEX,
            registered_index: 0,
        }
    }

    /// Check if this reference is valid
    pub fn is_valid(&self) -> bool {
        self.access_index != INVALID_ACCESS_INDEX
    }
}

impl Default for ConCommandRef {
    fn default() -> Self {
        Self::invalid()
    }
}

// ConVar flag constants
pub mod flags {
    /// No flags
    pub const FCVAR_NONE: u64 = 0;
    /// Allows concommand callback chaining
    pub const FCVAR_LINKED_CONCOMMAND: u64 = 1 << 0;
    /// Hidden in released products
    pub const FCVAR_DEVELOPMENTONLY: u64 = 1 << 1;
    /// Defined by the game DLL
    pub const FCVAR_GAMEDLL: u64 = 1 << 2;
    /// Defined by the client DLL
    pub const FCVAR_CLIENTDLL: u64 = 1 << 3;
    /// Hidden from find/autocomplete
    pub const FCVAR_HIDDEN: u64 = 1 << 4;
    /// Protected (password-like)
    pub const FCVAR_PROTECTED: u64 = 1 << 5;
    /// Singleplayer only
    pub const FCVAR_SPONLY: u64 = 1 << 6;
    /// Saved to config
    pub const FCVAR_ARCHIVE: u64 = 1 << 7;
    /// Notify players when changed
    pub const FCVAR_NOTIFY: u64 = 1 << 8;
    /// Changes client info string
    pub const FCVAR_USERINFO: u64 = 1 << 9;
    /// ConVar is a reference
    pub const FCVAR_REFERENCE: u64 = 1 << 10;
    /// Don't log changes
    pub const FCVAR_UNLOGGED: u64 = 1 << 11;
    /// Initial value set
    pub const FCVAR_INITIAL_SETVALUE: u64 = 1 << 12;
    /// Replicated to clients
    pub const FCVAR_REPLICATED: u64 = 1 << 13;
    /// Only with sv_cheats
    pub const FCVAR_CHEAT: u64 = 1 << 14;
    /// Per-user (splitscreen)
    pub const FCVAR_PER_USER: u64 = 1 << 15;
    /// Record in demo
    pub const FCVAR_DEMO: u64 = 1 << 16;
    /// Don't record in demo
    pub const FCVAR_DONTRECORD: u64 = 1 << 17;
    /// Currently calling callbacks
    pub const FCVAR_PERFORMING_CALLBACKS: u64 = 1 << 18;
    /// Available in release
    pub const FCVAR_RELEASE: u64 = 1 << 19;
    /// Menubar item
    pub const FCVAR_MENUBAR_ITEM: u64 = 1 << 20;
    /// Command-line enforced
    pub const FCVAR_COMMANDLINE_ENFORCED: u64 = 1 << 21;
    /// Cannot change when connected
    pub const FCVAR_NOT_CONNECTED: u64 = 1 << 22;
    /// VConsole fuzzy matching
    pub const FCVAR_VCONSOLE_FUZZY_MATCHING: u64 = 1 << 23;
    /// Server can execute on clients
    pub const FCVAR_SERVER_CAN_EXECUTE: u64 = 1 << 24;
    /// Client can execute
    pub const FCVAR_CLIENT_CAN_EXECUTE: u64 = 1 << 25;
    /// Server cannot query
    pub const FCVAR_SERVER_CANNOT_QUERY: u64 = 1 << 26;
    /// VConsole set focus
    pub const FCVAR_VCONSOLE_SET_FOCUS: u64 = 1 << 27;
    /// ClientCmd can execute
    pub const FCVAR_CLIENTCMD_CAN_EXECUTE: u64 = 1 << 28;
    /// Execute per tick
    pub const FCVAR_EXECUTE_PER_TICK: u64 = 1 << 29;
    /// Defensive flag
    pub const FCVAR_DEFENSIVE: u64 = 1 << 32;
}

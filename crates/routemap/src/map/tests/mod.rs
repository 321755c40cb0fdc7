// Tests for route registration and resolution
// Each submodule covers one slice of the map's behavior

pub mod mount_tests;

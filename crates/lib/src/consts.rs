pub const APP_NAME: &str = "bild";

/// Value of the `Created-By` manifest header.
pub const CREATED_BY: &str = "http://www.bildtool.org";

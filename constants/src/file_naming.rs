/// Sample table suffix. The profile name is the file name with this suffix removed.
pub const SAMPLE_TABLE_SUFFIX: &str = "_geom.tab";

/// Companion radargram image suffix, paired with the table by profile name.
pub const PROFILE_IMAGE_SUFFIX: &str = "_tiff.tif";

/// Extension claimed by the JSON settings asset loader.
pub const SETTINGS_EXTENSION: &str = "profiles.json";

pub fn sample_table_name(profile: &str) -> String {
    format!("{profile}{SAMPLE_TABLE_SUFFIX}")
}

pub fn profile_image_name(profile: &str) -> String {
    format!("{profile}{PROFILE_IMAGE_SUFFIX}")
}

/// Profile name for a sample table file name, or `None` if the name does not
/// carry the table suffix.
pub fn profile_name_from_table(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(SAMPLE_TABLE_SUFFIX)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_and_image_names_share_a_stem() {
        assert_eq!(sample_table_name("s_0123"), "s_0123_geom.tab");
        assert_eq!(profile_image_name("s_0123"), "s_0123_tiff.tif");
        assert_eq!(profile_name_from_table("s_0123_geom.tab"), Some("s_0123"));
    }

    #[test]
    fn foreign_files_have_no_profile_name() {
        assert_eq!(profile_name_from_table("s_0123_tiff.tif"), None);
        assert_eq!(profile_name_from_table("readme.tab"), None);
        assert_eq!(profile_name_from_table("_geom.tab"), None);
    }
}

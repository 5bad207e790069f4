//! Instruction template sent alongside the uploaded photo.

/// Characters inserted next to the subject.
pub const COMPANIONS: &str = "Judy Hopps and Nick Wilde from the movie Zootopia";

/// Builds the full editing instruction around a scenario's style fragment.
///
/// The fragment is inserted verbatim after `Style:`; everything else is fixed.
pub fn compose_instruction(style: &str) -> String {
    format!(
        "Instruction: Edit this image to create a group selfie.\n\
         Subject: Keep the person in the uploaded photo as the central subject. Do not change their face.\n\
         Additions: Add {COMPANIONS} standing right next to the person, looking at the camera, posing for a selfie.\n\
         Style: {style}\n\
         Quality: High quality, cinematic lighting, 3D animated movie style blending seamlessly with the real person."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_is_inserted_verbatim() {
        let style = "Background: a beach at *sunset*; {braces} stay.";
        let text = compose_instruction(style);
        assert!(text.contains(&format!("Style: {style}\n")));
    }

    #[test]
    fn test_fixed_directives_present() {
        let text = compose_instruction("anything");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Instruction:"));
        assert!(lines[1].contains("Do not change their face"));
        assert!(lines[2].contains("Judy Hopps and Nick Wilde"));
        assert!(lines[2].contains("selfie"));
        assert_eq!(lines[3], "Style: anything");
        assert!(lines[4].contains("cinematic lighting"));
        assert!(lines[4].contains("3D animated movie style"));
    }
}

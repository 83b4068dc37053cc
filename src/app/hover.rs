//! Debounced hover region spanning the sprite and the bubble.
//!
//! The sprite and bubble surfaces are treated as one logical region. Leaving
//! one surface for the other never hides the bubble; leaving both arms a grace
//! timer identified by a token, and any re-entry before it fires invalidates
//! the token.

/// Token identifying one armed grace period.
pub type GraceToken = u64;

/// Which surfaces the pointer is currently over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverRegion {
    sprite_inside: bool,
    bubble_inside: bool,
    grace: GraceToken,
}

impl HoverRegion {
    #[must_use]
    pub const fn is_inside(&self) -> bool {
        self.sprite_inside || self.bubble_inside
    }

    #[must_use]
    pub const fn over_sprite(&self) -> bool {
        self.sprite_inside
    }

    /// Records entry into the sprite. Returns whether the region was empty
    /// before, i.e. the pointer just arrived from outside.
    pub fn enter_sprite(&mut self) -> bool {
        let arrived = !self.is_inside();
        self.sprite_inside = true;
        self.cancel_grace();
        arrived
    }

    pub fn enter_bubble(&mut self) -> bool {
        let arrived = !self.is_inside();
        self.bubble_inside = true;
        self.cancel_grace();
        arrived
    }

    /// Records leaving the sprite. Returns a grace token if the pointer is now
    /// outside the whole region.
    pub fn leave_sprite(&mut self) -> Option<GraceToken> {
        self.sprite_inside = false;
        self.arm_if_outside()
    }

    pub fn leave_bubble(&mut self) -> Option<GraceToken> {
        self.bubble_inside = false;
        self.arm_if_outside()
    }

    /// Arms a grace period if the pointer is outside the region.
    pub fn arm_if_outside(&mut self) -> Option<GraceToken> {
        if self.is_inside() {
            None
        } else {
            self.grace += 1;
            Some(self.grace)
        }
    }

    /// Whether the grace period `token` ran out with the pointer still outside.
    #[must_use]
    pub const fn grace_expired(&self, token: GraceToken) -> bool {
        token == self.grace && !self.is_inside()
    }

    fn cancel_grace(&mut self) {
        self.grace += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_to_bubble_does_not_arm() {
        let mut hover = HoverRegion::default();
        assert!(hover.enter_sprite());
        assert!(!hover.enter_bubble());
        assert_eq!(hover.leave_sprite(), None);
        assert!(hover.is_inside());
    }

    #[test]
    fn reentry_invalidates_grace() {
        let mut hover = HoverRegion::default();
        hover.enter_sprite();
        let token = hover.leave_sprite().unwrap();

        hover.enter_bubble();
        hover.leave_bubble();
        assert!(!hover.grace_expired(token));
    }

    #[test]
    fn grace_expires_when_outside() {
        let mut hover = HoverRegion::default();
        hover.enter_bubble();
        let token = hover.leave_bubble().unwrap();
        assert!(hover.grace_expired(token));
    }
}

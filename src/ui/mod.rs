/// Shared chrome and transition rendering
///
/// This module handles:
/// - The fade scrim that covers every scene change (transition renderer)
/// - The start overlay with the one-time Begin button
/// - Progress bar, navigation hints, quality selector
/// - The falling-petal canvas overlay (scene_views.rs uses it)

pub mod scene_views;

use iced::widget::canvas::{self, Program};
use iced::widget::{button, column, container, pick_list, row, scrollable, text, Space};
use iced::{gradient, mouse, Alignment, Background, Border, Color, Element, Length, Point, Radians, Rectangle, Renderer, Theme};

use crate::assets::ImageQuality;
use crate::Message;

// Palette: deep purples with pink accents, matching the show's art
pub const DEEP_PURPLE: Color = Color::from_rgb(0.18, 0.06, 0.40);
pub const ROYAL_PURPLE: Color = Color::from_rgb(0.30, 0.11, 0.58);
pub const PINK: Color = Color::from_rgb(0.93, 0.28, 0.60);
pub const SOFT_PINK: Color = Color::from_rgb(0.97, 0.71, 0.83);
pub const NIGHT: Color = Color::from_rgb(0.06, 0.09, 0.16);

/// How long the fade scrim takes to clear after a scene change
pub const FADE_MS: u64 = 1_500;

/// Scrollable id of the memory lane strip, shared between the view and
/// the scroll_to commands issued by the update loop
pub fn gallery_scroll_id() -> scrollable::Id {
    scrollable::Id::new("memory-gallery")
}

/// Top-to-bottom linear gradient background
pub fn vertical_gradient(top: Color, bottom: Color) -> Background {
    let gradient = gradient::Linear::new(Radians(std::f32::consts::PI))
        .add_stop(0.0, top)
        .add_stop(1.0, bottom);
    Background::Gradient(gradient.into())
}

/// Full-viewport black scrim; alpha 1.0 right after a scene change,
/// fading to 0 over FADE_MS
pub fn scrim<'a>(alpha: f32) -> Element<'a, Message> {
    let alpha = alpha.clamp(0.0, 1.0);
    container(Space::new(Length::Fill, Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(Background::Color(Color { a: alpha, ..Color::BLACK })),
            ..container::Style::default()
        })
        .into()
}

/// The pre-show overlay: title, the one-time Begin button, a sound hint
pub fn start_overlay<'a>() -> Element<'a, Message> {
    let begin = button(
        text("▶  BEGIN JOURNEY")
            .size(24)
            .color(Color::WHITE),
    )
    .padding([18, 48])
    .style(|_theme, _status| button::Style {
        background: Some(vertical_gradient(PINK, ROYAL_PURPLE)),
        text_color: Color::WHITE,
        border: Border {
            color: SOFT_PINK,
            width: 1.0,
            radius: 40.0.into(),
        },
        ..button::Style::default()
    })
    .on_press(Message::Begin);

    let content = column![
        text("A Journey for You").size(72).color(SOFT_PINK),
        Space::new(Length::Shrink, Length::Fixed(40.0)),
        begin,
        Space::new(Length::Shrink, Length::Fixed(32.0)),
        text("TURN ON YOUR SOUND FOR THE FULL EXPERIENCE")
            .size(12)
            .color(Color { a: 0.7, ..SOFT_PINK }),
    ]
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(vertical_gradient(DEEP_PURPLE, ROYAL_PURPLE)),
            ..container::Style::default()
        })
        .into()
}

/// Thin progress bar along the bottom edge: filled fraction (current+1)/total
pub fn progress_bar<'a>(current: usize, total: usize) -> Element<'a, Message> {
    let filled = (current + 1).min(total) as u16;
    let rest = (total - (current + 1).min(total)) as u16;

    let mut bar = row![container(Space::new(Length::Fill, Length::Fixed(6.0)))
        .width(Length::FillPortion(filled.max(1)))
        .style(|_theme| container::Style {
            background: Some(vertical_gradient(PINK, ROYAL_PURPLE)),
            ..container::Style::default()
        })];

    if rest > 0 {
        bar = bar.push(
            container(Space::new(Length::Fill, Length::Fixed(6.0)))
                .width(Length::FillPortion(rest))
                .style(|_theme| container::Style {
                    background: Some(Background::Color(Color { a: 0.85, ..NIGHT })),
                    ..container::Style::default()
                }),
        );
    }

    container(bar)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_y(Alignment::End)
        .into()
}

/// Dim "← Prev / Next →" hints along the bottom
pub fn nav_hints<'a>() -> Element<'a, Message> {
    let hint = |label: &'static str| {
        text(label)
            .size(14)
            .color(Color {
                a: 0.3,
                ..Color::WHITE
            })
    };

    container(
        row![hint("← Prev"), Space::new(Length::Fill, Length::Shrink), hint("Next →")]
            .width(Length::Fill),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .align_y(Alignment::End)
    .padding(iced::Padding {
        bottom: 40.0,
        left: 40.0,
        right: 40.0,
        top: 0.0,
    })
    .into()
}

/// Quality selector pinned to the top-right corner. The pick list consumes
/// its own clicks, so choosing a quality never doubles as navigation.
pub fn quality_selector<'a>(current: ImageQuality) -> Element<'a, Message> {
    let selector = pick_list(ImageQuality::ALL, Some(current), Message::QualityPicked)
        .text_size(12)
        .padding([4, 10]);

    container(selector)
        .width(Length::Fill)
        .align_x(Alignment::End)
        .padding(16)
        .into()
}

/// Falling petals drawn over the gate and finale scenes. Placement is a
/// pure function of the petal index and the animation clock, so the
/// overlay needs no per-petal state.
pub struct Petals {
    pub clock: f32,
    pub count: usize,
}

/// Cheap deterministic hash of a petal index onto [0, 1)
fn scatter(index: usize, salt: f32) -> f32 {
    let x = (index as f32 + salt) * 12.9898;
    (x.sin() * 43758.547).fract().abs()
}

impl Program<Message> for Petals {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        for i in 0..self.count {
            let fall_secs = 10.0 + scatter(i, 1.0) * 10.0;
            let phase = (self.clock / fall_secs + scatter(i, 2.0)).fract();

            let sway = (self.clock * 0.8 + scatter(i, 3.0) * std::f32::consts::TAU).sin() * 24.0;
            let x = scatter(i, 4.0) * bounds.width + sway;
            let y = phase * (bounds.height + 40.0) - 20.0;
            let radius = 2.0 + scatter(i, 5.0) * 4.0;

            // Fade in at the top, fade out near the ground
            let alpha = 0.6 * (1.0 - (phase - 0.5).abs() * 2.0).clamp(0.1, 1.0);

            frame.fill(
                &canvas::Path::circle(Point::new(x, y), radius),
                Color { a: alpha, ..SOFT_PINK },
            );
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_is_deterministic_and_bounded() {
        for i in 0..200 {
            let a = scatter(i, 4.0);
            assert_eq!(a, scatter(i, 4.0));
            assert!((0.0..1.0).contains(&a), "scatter out of range: {}", a);
        }
    }

    #[test]
    fn test_scatter_varies_with_index() {
        // Not a randomness test, just "the petals don't stack"
        let distinct: std::collections::HashSet<u32> =
            (0..30).map(|i| (scatter(i, 4.0) * 1000.0) as u32).collect();
        assert!(distinct.len() > 20);
    }
}

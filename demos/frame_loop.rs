use std::thread;
use std::time::Duration;

use inlet::backends::ScriptedBackend;
use inlet::{ButtonCode, EventFilter, Input, InputAxis, Logger, Modifiers, Point, PointerButton};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut input = Input::new();
    input.add_observer(Logger::new(), EventFilter::All);

    let pad = ScriptedBackend::new("scripted-pad", 1);
    input.register_backend(Box::new(pad.clone()));

    // A platform thread reporting cursor and relative mouse motion while the
    // frame loop runs.
    let sink = input.sink().clone();
    let producer = thread::spawn(move || {
        for i in 0..30 {
            sink.cursor_moved(Point::new(i * 4, i * 2), [false; 3], Modifiers::default());
            sink.mouse_moved(3, -1, 0);
            if i == 10 {
                sink.cursor_pressed(
                    Point::new(i * 4, i * 2),
                    PointerButton::Left,
                    [true, false, false],
                    Modifiers::default(),
                );
            }
            thread::sleep(Duration::from_millis(4));
        }
    });

    pad.press(ButtonCode(0x30));
    pad.move_axis(InputAxis::LeftStickX, 20_000);

    for frame in 0..12u32 {
        input.update();
        // The real application pumps platform messages here.
        thread::sleep(Duration::from_millis(16));
        input.trigger_callbacks();

        if frame == 4 {
            pad.release(ButtonCode(0x30));
        } else {
            pad.move_axis(InputAxis::LeftStickX, 20_000);
        }

        println!(
            "frame {frame:2}  pos=({:4},{:4})  stick_x={:+.2}  mouse_x={:+.2}  button_held={}",
            input.pointer_position().x,
            input.pointer_position().y,
            input.axis_value(InputAxis::LeftStickX, 1),
            input.axis_value(InputAxis::MouseX, 0),
            input.is_button_held(ButtonCode(0x30), 1),
        );
    }

    producer.join().unwrap();
}

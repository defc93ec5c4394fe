/// Register the queue a reader thread feeds and the `Serial<T>` event it is drained into
macro_rules! serial_register_event {
    ($app:ident, $( ($evt_ty:ty, $rx:ident) ),* $(,)?) => {
        $(
            ($app).add_event::<Serial<$evt_ty>>();
            ($app).add_systems(bevy::prelude::PreUpdate, process_network_queue::<$evt_ty>);
            ($app).insert_resource(EventQueue::<$evt_ty>(Mutex::new($rx)));
        )*
    };
}

/// Create one channel per reader event, register the receivers and
/// collect the senders into `ReaderChannels`.
///
/// Field names are the snake case of the event type: `OnResponse` -> `on_response`.
macro_rules! serial_reader_channels {
    ($app:ident, $( $evt:ident ),* $(,)?) => {{
        paste::paste! {
            $(
                let ([<$evt:snake _tx>], [<$evt:snake _rx>]) = crossbeam_channel::unbounded::<$evt>();
                serial_register_event!($app, ($evt, [<$evt:snake _rx>]));
            )*
            ReaderChannels {
                $( [<$evt:snake>]: [<$evt:snake _tx>], )*
            }
        }
    }};
}
